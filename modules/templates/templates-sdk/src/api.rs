use async_trait::async_trait;
use modkit::{SecurityCtx, ServiceKind, ServiceName};
use uuid::Uuid;

use crate::errors::TemplatesError;
use crate::models::{NewTemplate, Page, PageRequest, Template, TemplatePatch};

/// CRUD over the calling user's templates.
///
/// Every operation is scoped to `ctx.subject_id()`; templates of other users
/// are reported as `NotFound`.
#[async_trait]
pub trait TemplatesApi: Send + Sync {
    async fn list_templates(
        &self,
        ctx: &SecurityCtx,
        page: PageRequest,
    ) -> Result<Page<Template>, TemplatesError>;

    async fn get_template(&self, ctx: &SecurityCtx, id: Uuid) -> Result<Template, TemplatesError>;

    async fn create_template(
        &self,
        ctx: &SecurityCtx,
        new_template: NewTemplate,
    ) -> Result<Template, TemplatesError>;

    async fn update_template(
        &self,
        ctx: &SecurityCtx,
        id: Uuid,
        patch: TemplatePatch,
    ) -> Result<Template, TemplatesError>;

    async fn delete_template(&self, ctx: &SecurityCtx, id: Uuid) -> Result<(), TemplatesError>;
}

pub struct TemplatesService;

impl ServiceKind for TemplatesService {
    const NAME: ServiceName = ServiceName::Templates;
    type Api = dyn TemplatesApi;
}
