use std::collections::HashMap;

use parking_lot::RwLock;
use templates_sdk::Template;
use uuid::Uuid;

use crate::domain::repo::TemplatesRepository;

#[derive(Default)]
pub struct InMemoryTemplatesRepository {
    templates: RwLock<HashMap<Uuid, Template>>,
}

impl InMemoryTemplatesRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TemplatesRepository for InMemoryTemplatesRepository {
    fn find(&self, owner_id: Uuid, id: Uuid) -> Option<Template> {
        self.templates
            .read()
            .get(&id)
            .filter(|t| t.owner_id == owner_id)
            .cloned()
    }

    fn list(&self, owner_id: Uuid) -> Vec<Template> {
        let mut items: Vec<Template> = self
            .templates
            .read()
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        items
    }

    fn save_unique(&self, template: Template) -> bool {
        let mut templates = self.templates.write();
        let taken = templates.values().any(|t| {
            t.owner_id == template.owner_id
                && t.id != template.id
                && t.name.eq_ignore_ascii_case(&template.name)
        });
        if taken {
            return false;
        }
        templates.insert(template.id, template);
        true
    }

    fn delete(&self, owner_id: Uuid, id: Uuid) -> bool {
        let mut templates = self.templates.write();
        if templates.get(&id).is_some_and(|t| t.owner_id == owner_id) {
            templates.remove(&id);
            true
        } else {
            false
        }
    }
}
