use crate::contract::model::Employee;
use crate::infra::storage::entity::Model as EmployeeEntity;

impl From<EmployeeEntity> for Employee {
    fn from(entity: EmployeeEntity) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
        }
    }
}
