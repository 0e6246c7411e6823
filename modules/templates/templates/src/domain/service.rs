use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use templates_sdk::{NewTemplate, Page, PageRequest, Template, TemplatePatch};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::DomainError;
use super::repo::TemplatesRepository;
use crate::config::TemplatesConfig;

/// Validation and ownership rules over a `TemplatesRepository`.
pub struct TemplatesDomainService {
    repo: Arc<dyn TemplatesRepository>,
    config: TemplatesConfig,
    last_stamp: Mutex<DateTime<Utc>>,
}

impl TemplatesDomainService {
    #[must_use]
    pub fn new(repo: Arc<dyn TemplatesRepository>, config: TemplatesConfig) -> Self {
        Self {
            repo,
            config,
            last_stamp: Mutex::new(DateTime::<Utc>::MIN_UTC),
        }
    }

    #[must_use]
    pub fn list(&self, owner_id: Uuid, page: PageRequest) -> Page<Template> {
        let limit = page.limit.clamp(1, self.config.max_page_size.max(1));
        let all = self.repo.list(owner_id);
        let total = all.len();
        let items = all.into_iter().skip(page.offset).take(limit).collect();
        Page {
            items,
            total,
            offset: page.offset,
            limit,
        }
    }

    /// # Errors
    /// `NotFound` when `id` does not exist or belongs to another user.
    pub fn get(&self, owner_id: Uuid, id: Uuid) -> Result<Template, DomainError> {
        self.repo
            .find(owner_id, id)
            .ok_or(DomainError::NotFound(id))
    }

    /// # Errors
    /// `Validation` for bad name or content, `DuplicateName` when the user
    /// already has a template with that name.
    pub fn create(&self, owner_id: Uuid, new_template: NewTemplate) -> Result<Template, DomainError> {
        let name = self.validate_name(&new_template.name)?;
        self.validate_content(&new_template.content)?;

        let now = self.stamp();
        let template = Template {
            id: Uuid::new_v4(),
            owner_id,
            name,
            content: new_template.content,
            created_at: now,
            updated_at: now,
        };
        if !self.repo.save_unique(template.clone()) {
            return Err(DomainError::DuplicateName(template.name));
        }
        info!(template_id = %template.id, "template created");
        Ok(template)
    }

    /// # Errors
    /// `NotFound`, `Validation` or `DuplicateName`.
    pub fn update(
        &self,
        owner_id: Uuid,
        id: Uuid,
        patch: TemplatePatch,
    ) -> Result<Template, DomainError> {
        let mut template = self.get(owner_id, id)?;

        if let Some(name) = patch.name {
            template.name = self.validate_name(&name)?;
        }
        if let Some(content) = patch.content {
            self.validate_content(&content)?;
            template.content = content;
        }

        template.updated_at = self.stamp();
        if !self.repo.save_unique(template.clone()) {
            return Err(DomainError::DuplicateName(template.name));
        }
        debug!(template_id = %id, "template updated");
        Ok(template)
    }

    /// # Errors
    /// `NotFound` when `id` does not exist or belongs to another user.
    pub fn delete(&self, owner_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        if self.repo.delete(owner_id, id) {
            info!(template_id = %id, "template deleted");
            Ok(())
        } else {
            Err(DomainError::NotFound(id))
        }
    }

    fn validate_name(&self, name: &str) -> Result<String, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name", "must not be empty"));
        }
        if name.chars().count() > self.config.max_name_length {
            return Err(DomainError::validation(
                "name",
                format!("must be at most {} characters", self.config.max_name_length),
            ));
        }
        Ok(name.to_owned())
    }

    fn validate_content(&self, content: &str) -> Result<(), DomainError> {
        if content.len() > self.config.max_content_length {
            return Err(DomainError::validation(
                "content",
                format!("must be at most {} bytes", self.config.max_content_length),
            ));
        }
        Ok(())
    }

    /// Strictly increasing timestamps, so "most recently updated" is total.
    fn stamp(&self) -> DateTime<Utc> {
        let mut last = self.last_stamp.lock();
        let next = Utc::now().max(*last + TimeDelta::microseconds(1));
        *last = next;
        next
    }
}
