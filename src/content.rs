use serde::Serialize;
use std::fmt;

/// The closed set of content kinds published by the directory.
///
/// Each kind has its own slug-uniqueness scope and its own translation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentType {
    Article,
    PracticeArea,
    Service,
    SpecialistProfile,
    CompanyProfile,
    Team,
}

impl ContentType {
    /// All content types, in route-table order.
    pub const ALL: [ContentType; 6] = [
        ContentType::SpecialistProfile,
        ContentType::CompanyProfile,
        ContentType::Article,
        ContentType::PracticeArea,
        ContentType::Service,
        ContentType::Team,
    ];

    /// Top-level route segment for this type (e.g. `news` for articles).
    pub fn route(&self) -> &'static str {
        match self {
            ContentType::Article => "news",
            ContentType::PracticeArea => "practices",
            ContentType::Service => "services",
            ContentType::SpecialistProfile => "specialists",
            ContentType::CompanyProfile => "companies",
            ContentType::Team => "teams",
        }
    }

    /// Look up a content type by its top-level route segment.
    pub fn from_route(segment: &str) -> Option<ContentType> {
        Self::ALL.into_iter().find(|ty| ty.route() == segment)
    }

    /// Name used in logs and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::PracticeArea => "practiceArea",
            ContentType::Service => "service",
            ContentType::SpecialistProfile => "specialistProfile",
            ContentType::CompanyProfile => "companyProfile",
            ContentType::Team => "team",
        }
    }

    /// Parse either the type name or its route segment.
    pub fn parse(value: &str) -> Option<ContentType> {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name().eq_ignore_ascii_case(value))
            .or_else(|| Self::from_route(value))
    }

    /// Whether items of this type may reference a category.
    pub fn is_categorized(&self) -> bool {
        matches!(self, ContentType::Article | ContentType::Service)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stable, language-independent identity of a content item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identity of a node in the category forest.
///
/// Category identities live in their own space, disjoint from content ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// Category translations are looked up through the same slug scopes as content.
impl From<CategoryId> for ContentId {
    fn from(value: CategoryId) -> Self {
        ContentId(value.0)
    }
}

impl From<ContentId> for CategoryId {
    fn from(value: ContentId) -> Self {
        CategoryId(value.0)
    }
}

/// One row of the category table: a node and its optional parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEdge {
    pub id: CategoryId,
    pub parent_id: Option<CategoryId>,
}

impl CategoryEdge {
    pub fn new(id: impl Into<String>, parent_id: Option<&str>) -> Self {
        Self {
            id: CategoryId::new(id),
            parent_id: parent_id.map(CategoryId::new),
        }
    }

    pub fn root(id: impl Into<String>) -> Self {
        Self::new(id, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Route Table Tests ====================

    #[test]
    fn test_route_segments() {
        assert_eq!(ContentType::Article.route(), "news");
        assert_eq!(ContentType::PracticeArea.route(), "practices");
        assert_eq!(ContentType::Service.route(), "services");
        assert_eq!(ContentType::SpecialistProfile.route(), "specialists");
        assert_eq!(ContentType::CompanyProfile.route(), "companies");
        assert_eq!(ContentType::Team.route(), "teams");
    }

    #[test]
    fn test_from_route_roundtrips_every_type() {
        for ty in ContentType::ALL {
            assert_eq!(ContentType::from_route(ty.route()), Some(ty));
        }
    }

    #[test]
    fn test_from_route_unknown() {
        assert_eq!(ContentType::from_route("about"), None);
        assert_eq!(ContentType::from_route(""), None);
        assert_eq!(ContentType::from_route("News"), None);
    }

    #[test]
    fn test_parse_accepts_name_and_route() {
        assert_eq!(ContentType::parse("article"), Some(ContentType::Article));
        assert_eq!(ContentType::parse("practiceArea"), Some(ContentType::PracticeArea));
        assert_eq!(ContentType::parse("PRACTICEAREA"), Some(ContentType::PracticeArea));
        assert_eq!(ContentType::parse("companies"), Some(ContentType::CompanyProfile));
        assert_eq!(ContentType::parse("nope"), None);
    }

    #[test]
    fn test_only_articles_and_services_are_categorized() {
        let categorized: Vec<_> = ContentType::ALL
            .into_iter()
            .filter(|ty| ty.is_categorized())
            .collect();
        assert_eq!(categorized.len(), 2);
        assert!(categorized.contains(&ContentType::Article));
        assert!(categorized.contains(&ContentType::Service));
    }

    // ==================== Identity Tests ====================

    #[test]
    fn test_category_id_converts_to_content_id() {
        let category = CategoryId::new("litigation");
        let id: ContentId = category.clone().into();
        assert_eq!(id.as_str(), "litigation");
        assert_eq!(CategoryId::from(id), category);
    }

    #[test]
    fn test_content_type_serializes_camel_case() {
        let json = serde_json::to_string(&ContentType::SpecialistProfile).expect("serialize");
        assert_eq!(json, "\"specialistProfile\"");
    }

    #[test]
    fn test_category_edge_root() {
        let edge = CategoryEdge::root("litigation");
        assert_eq!(edge.id.as_str(), "litigation");
        assert!(edge.parent_id.is_none());
    }
}
