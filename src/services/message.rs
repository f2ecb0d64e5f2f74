use chrono::Utc;

use super::policy::{self, Actor};
use super::mint_id;
use crate::db::models::counter::Sequence;
use crate::db::models::message::{Message, MessageListParams, NewMessage};
use crate::db::models::pagination::{Page, PageRequest};
use crate::db::models::project::{Project, ProjectFilter};
use crate::db::Repositories;
use crate::error::{AppError, StoreContext};
use crate::utils::validate;

#[derive(Clone)]
pub struct MessageService {
    repos: Repositories,
}

impl MessageService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    async fn find_project(&self, id: &str) -> Result<Option<Project>, AppError> {
        self.repos.projects.find_by_id(id).await.context("failed to load project")
    }

    async fn load_project(&self, id: &str) -> Result<Project, AppError> {
        self.find_project(id).await?.ok_or_else(|| AppError::not_found("project"))
    }

    async fn load(&self, id: &str) -> Result<Message, AppError> {
        self.repos
            .messages
            .find_by_id(id)
            .await
            .context("failed to load message")?
            .ok_or_else(|| AppError::not_found("message"))
    }

    /// Messages outlive a deleted project only for admins.
    async fn visible(&self, actor: &Actor, message: &Message) -> Result<Option<Project>, AppError> {
        let project = self.find_project(&message.project_id).await?;
        match &project {
            Some(project) => policy::view_project(actor, project)?,
            None if actor.is_admin() => {}
            None => return Err(AppError::not_found("message")),
        }
        Ok(project)
    }

    pub async fn create(&self, actor: &Actor, payload: NewMessage) -> Result<Message, AppError> {
        let content = validate::required("content", &payload.content)?;
        let project = self.load_project(payload.project_id.trim()).await?;
        policy::view_project(actor, &project)?;

        let id = mint_id(self.repos.counters.as_ref(), Sequence::Message).await?;
        let now = Utc::now();
        let message = Message {
            id,
            content,
            sender_id: actor.id.clone(),
            project_id: project.id,
            created_at: now,
            updated_at: now,
        };
        self.repos.messages.create(&message).await.context("failed to create message")?;
        Ok(message)
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> Result<Message, AppError> {
        let message = self.load(id).await?;
        self.visible(actor, &message).await?;
        Ok(message)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), AppError> {
        let message = self.load(id).await?;
        let project = self.visible(actor, &message).await?;
        policy::delete_message(actor, &message, project.as_ref())?;
        let deleted = self.repos.messages.delete(id).await.context("failed to delete message")?;
        if !deleted {
            return Err(AppError::not_found("message"));
        }
        Ok(())
    }

    /// Newest first.
    pub async fn list_by_project(
        &self,
        actor: &Actor,
        project_id: &str,
        page: PageRequest,
    ) -> Result<Page<Message>, AppError> {
        let project = self.load_project(project_id).await?;
        policy::view_project(actor, &project)?;
        let ids = [project.id];
        let (messages, total) = self
            .repos
            .messages
            .list(Some(ids.as_slice()), page)
            .await
            .context("failed to list messages")?;
        Ok(Page::new(messages, total, page))
    }

    /// Every message the caller can see, or one project's when `project_id`
    /// is given.
    pub async fn list(&self, actor: &Actor, params: MessageListParams) -> Result<Page<Message>, AppError> {
        let page = PageRequest::new(params.page, params.page_size)?;
        if let Some(project_id) = validate::optional(params.project_id) {
            return self.list_by_project(actor, &project_id, page).await;
        }

        let scope = if actor.is_admin() {
            None
        } else {
            let mut filter = ProjectFilter::default();
            policy::scope_projects(actor, &mut filter);
            let ids = self.repos.projects.ids(&filter).await.context("failed to list projects")?;
            if ids.is_empty() {
                return Ok(Page::empty(page));
            }
            Some(ids)
        };
        let (messages, total) = self
            .repos
            .messages
            .list(scope.as_deref(), page)
            .await
            .context("failed to list messages")?;
        Ok(Page::new(messages, total, page))
    }
}
