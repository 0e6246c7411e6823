use std::sync::Arc;

use async_trait::async_trait;
use modkit::SecurityCtx;
use templates_sdk::{
    NewTemplate, Page, PageRequest, Template, TemplatePatch, TemplatesApi, TemplatesError,
};
use uuid::Uuid;

use crate::domain::service::TemplatesDomainService;

/// `TemplatesApi` for the calling user, backed by the domain service.
pub struct TemplatesLocalClient {
    service: Arc<TemplatesDomainService>,
}

impl TemplatesLocalClient {
    #[must_use]
    pub fn new(service: Arc<TemplatesDomainService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TemplatesApi for TemplatesLocalClient {
    async fn list_templates(
        &self,
        ctx: &SecurityCtx,
        page: PageRequest,
    ) -> Result<Page<Template>, TemplatesError> {
        Ok(self.service.list(ctx.subject_id(), page))
    }

    async fn get_template(&self, ctx: &SecurityCtx, id: Uuid) -> Result<Template, TemplatesError> {
        self.service
            .get(ctx.subject_id(), id)
            .map_err(TemplatesError::from)
    }

    async fn create_template(
        &self,
        ctx: &SecurityCtx,
        new_template: NewTemplate,
    ) -> Result<Template, TemplatesError> {
        self.service
            .create(ctx.subject_id(), new_template)
            .map_err(TemplatesError::from)
    }

    async fn update_template(
        &self,
        ctx: &SecurityCtx,
        id: Uuid,
        patch: TemplatePatch,
    ) -> Result<Template, TemplatesError> {
        self.service
            .update(ctx.subject_id(), id, patch)
            .map_err(TemplatesError::from)
    }

    async fn delete_template(&self, ctx: &SecurityCtx, id: Uuid) -> Result<(), TemplatesError> {
        self.service
            .delete(ctx.subject_id(), id)
            .map_err(TemplatesError::from)
    }
}
