use crate::domain::error::DomainError;

const SERIE_LEN: usize = 4;
const NUMBER_LEN: usize = 6;

/// A validated passport identifier: a 4-digit series and a 6-digit number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passport {
    serie: String,
    number: String,
}

impl Passport {
    /// Parse the combined `"SSSS NNNNNN"` form: ASCII digits, exactly one space.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.split_once(' ') {
            Some((serie, number)) if is_digits(serie, SERIE_LEN) && is_digits(number, NUMBER_LEN) => {
                Ok(Self {
                    serie: serie.to_owned(),
                    number: number.to_owned(),
                })
            }
            _ => Err(DomainError::invalid_passport(raw)),
        }
    }

    /// Build from already separated parts, as used by full updates.
    pub fn from_parts(serie: &str, number: &str) -> Result<Self, DomainError> {
        if !is_digits(serie, SERIE_LEN) {
            return Err(DomainError::validation(
                "passportSerie",
                "must be exactly 4 digits",
            ));
        }
        if !is_digits(number, NUMBER_LEN) {
            return Err(DomainError::validation(
                "passportNumber",
                "must be exactly 6 digits",
            ));
        }
        Ok(Self {
            serie: serie.to_owned(),
            number: number.to_owned(),
        })
    }

    pub fn serie(&self) -> &str {
        &self.serie
    }

    pub fn number(&self) -> &str {
        &self.number
    }
}

fn is_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}
