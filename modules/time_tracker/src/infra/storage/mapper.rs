use crate::contract::model::{User, WorkInterval};
use crate::infra::storage::entity::{user, work_interval};

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            passport_serie: m.passport_serie,
            passport_number: m.passport_number,
            surname: m.surname,
            name: m.name,
            patronymic: m.patronymic,
            address: m.address,
        }
    }
}

impl From<work_interval::Model> for WorkInterval {
    fn from(m: work_interval::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            task_id: m.task_id,
            description: m.description,
            start_time: m.start_time,
            end_time: m.end_time,
        }
    }
}
