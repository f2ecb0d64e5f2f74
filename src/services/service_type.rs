use chrono::Utc;
use uuid::Uuid;

use super::policy::{self, Actor};
use crate::db::models::service_type::{NewServiceType, ServiceType, ServiceTypeStatus, UpdateServiceType};
use crate::db::Repositories;
use crate::error::{AppError, StoreContext};
use crate::utils::validate;

/// Catalog of offered services. Reference data: admins curate it, anyone can
/// read the list.
#[derive(Clone)]
pub struct ServiceTypeService {
    repos: Repositories,
}

impl ServiceTypeService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    async fn load(&self, id: &str) -> Result<ServiceType, AppError> {
        self.repos
            .service_types
            .find_by_id(id)
            .await
            .context("failed to load service type")?
            .ok_or_else(|| AppError::not_found("service type"))
    }

    pub async fn create(&self, actor: &Actor, payload: NewServiceType) -> Result<ServiceType, AppError> {
        policy::admin_only(actor)?;
        let now = Utc::now();
        let service_type = ServiceType {
            id: Uuid::new_v4().to_string(),
            name: validate::required("name", &payload.name)?,
            description: payload.description.trim().to_string(),
            status: payload.status,
            created_at: now,
            updated_at: now,
        };
        self.repos
            .service_types
            .create(&service_type)
            .await
            .context("failed to create service type")?;
        Ok(service_type)
    }

    pub async fn get(&self, id: &str) -> Result<ServiceType, AppError> {
        self.load(id).await
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        patch: UpdateServiceType,
    ) -> Result<ServiceType, AppError> {
        policy::admin_only(actor)?;
        if patch.name.is_none() && patch.description.is_none() && patch.status.is_none() {
            return Err(AppError::Validation("no fields to update".into()));
        }
        let mut service_type = self.load(id).await?;
        if let Some(name) = patch.name {
            service_type.name = validate::required("name", &name)?;
        }
        if let Some(description) = patch.description {
            service_type.description = description.trim().to_string();
        }
        if let Some(status) = patch.status {
            service_type.status = status;
        }
        let updated = self
            .repos
            .service_types
            .update(&service_type)
            .await
            .context("failed to update service type")?;
        if !updated {
            return Err(AppError::not_found("service type"));
        }
        self.load(id).await
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), AppError> {
        policy::admin_only(actor)?;
        let deleted = self
            .repos
            .service_types
            .delete(id)
            .await
            .context("failed to delete service type")?;
        if !deleted {
            return Err(AppError::not_found("service type"));
        }
        Ok(())
    }

    pub async fn list(&self, status: Option<ServiceTypeStatus>) -> Result<Vec<ServiceType>, AppError> {
        self.repos
            .service_types
            .list(status)
            .await
            .context("failed to list service types")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::user::Role;
    use crate::error::ErrorKind;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn admins_curate_and_status_filters_the_list() {
        let service = ServiceTypeService::new(Repositories::in_memory());
        let admin = Actor::new("USER01", Role::Admin);
        let web = assert_ok!(
            service
                .create(
                    &admin,
                    NewServiceType {
                        name: "Web development".into(),
                        description: String::new(),
                        status: ServiceTypeStatus::Active,
                    },
                )
                .await
        );
        assert!(Uuid::parse_str(&web.id).is_ok());

        let retired = assert_ok!(
            service
                .create(
                    &admin,
                    NewServiceType {
                        name: "Flash games".into(),
                        description: String::new(),
                        status: ServiceTypeStatus::Active,
                    },
                )
                .await
        );
        let patch = UpdateServiceType { status: Some(ServiceTypeStatus::Inactive), ..Default::default() };
        assert_ok!(service.update(&admin, &retired.id, patch).await);

        let active = assert_ok!(service.list(Some(ServiceTypeStatus::Active)).await);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, web.id);
        assert_eq!(assert_ok!(service.list(None).await).len(), 2);
    }

    #[tokio::test]
    async fn non_admins_cannot_write() {
        let service = ServiceTypeService::new(Repositories::in_memory());
        let client = Actor::new("USER02", Role::Client);
        let err = service
            .create(
                &client,
                NewServiceType { name: "X".into(), description: String::new(), status: ServiceTypeStatus::Active },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = service.get("missing").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
