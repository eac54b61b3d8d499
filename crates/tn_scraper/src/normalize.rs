use tn_core::Article;
use uuid::Uuid;

/// Last stop before persistence: guarantee `id` and `resource` are set.
/// Fields already filled by extraction are never overwritten.
pub fn finalize(article: &mut Article, resource: &str) {
    if article.resource.is_empty() {
        article.resource = resource.to_string();
    }
    if article.id.is_empty() {
        article.id = Uuid::new_v4().to_string();
    }
}
