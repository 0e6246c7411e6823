use templates_sdk::Template;
use uuid::Uuid;

/// Storage port for templates. Implementations do not validate.
pub trait TemplatesRepository: Send + Sync {
    fn find(&self, owner_id: Uuid, id: Uuid) -> Option<Template>;

    /// All templates of `owner_id`, most recently updated first.
    fn list(&self, owner_id: Uuid) -> Vec<Template>;

    /// Insert or replace `template` unless another template of the same
    /// owner already has its name (case-insensitive). The check and the
    /// write are one atomic step. Returns `false` when the name is taken.
    fn save_unique(&self, template: Template) -> bool;

    /// Returns whether a template was removed.
    fn delete(&self, owner_id: Uuid, id: Uuid) -> bool;
}
