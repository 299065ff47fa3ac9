//! Schema classes and their declarative options.
//!
//! A schema class is any type implementing [`utoipa::ToSchema`] (which supplies the
//! JSON Schema) plus [`ApiSchema`], which exposes the declarative options the builders
//! read. Builders carry the type-erased [`SchemaClass`] handle so request and response
//! schemas can be chosen independently at runtime.

use std::borrow::Cow;
use std::fmt;
use utoipa::openapi::{RefOr, schema::Schema};

/// Schemas collected for the components section: root first, then dependencies.
pub type SchemaCollection = Vec<(String, RefOr<Schema>)>;

/// Declarative options of a schema class.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    pub tags: Vec<String>,
    pub url_id_field: Option<String>,
    pub description: Option<String>,
}

impl SchemaOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn url_id_field(mut self, field: impl Into<String>) -> Self {
        self.url_id_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }
}

/// A schema class usable by the operation builders.
///
/// Options are optional capabilities: a schema that does not override
/// [`ApiSchema::options`] has no tags, no url id field and no description.
///
/// ```
/// use opsynth::{ApiSchema, SchemaOptions};
///
/// #[derive(utoipa::ToSchema)]
/// struct BookSchema {
///     id: i64,
///     title: String,
/// }
///
/// impl ApiSchema for BookSchema {
///     fn options() -> SchemaOptions {
///         SchemaOptions::new().tags(["Books"]).url_id_field("id")
///     }
/// }
/// ```
pub trait ApiSchema: utoipa::ToSchema + 'static {
    fn options() -> SchemaOptions {
        SchemaOptions::default()
    }
}

/// Type-erased handle to a schema class.
#[derive(Clone, Copy)]
pub struct SchemaClass {
    type_name: fn() -> Cow<'static, str>,
    options: fn() -> SchemaOptions,
    collect: fn() -> SchemaCollection,
}

fn collect_schemas<T: ApiSchema>() -> SchemaCollection {
    // Root schema goes first as the actual object, never as a self-ref.
    let mut collected: SchemaCollection =
        vec![(T::name().into_owned(), <T as utoipa::PartialSchema>::schema())];
    T::schemas(&mut collected);
    collected
}

impl SchemaClass {
    #[must_use]
    pub fn of<T: ApiSchema>() -> Self {
        Self {
            type_name: T::name,
            options: T::options,
            collect: collect_schemas::<T>,
        }
    }

    /// Name as reported by `utoipa`, before the registry resolves it.
    #[must_use]
    pub fn type_name(&self) -> Cow<'static, str> {
        (self.type_name)()
    }

    #[must_use]
    pub fn options(&self) -> SchemaOptions {
        (self.options)()
    }

    /// The class schema and all schemas it references.
    #[must_use]
    pub fn collect(&self) -> SchemaCollection {
        (self.collect)()
    }
}

impl fmt::Debug for SchemaClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaClass")
            .field("type_name", &self.type_name())
            .field("options", &self.options())
            .finish_non_exhaustive()
    }
}

/// Classification of a schema by its registry name.
///
/// Both flags are computed independently; a name may carry both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SchemaKind {
    /// Name contains `deleted`; such response schemas document a `204` without body.
    pub deletion: bool,
    /// Name contains `create`; such request schemas never get an id path parameter.
    pub creation: bool,
}

impl SchemaKind {
    #[must_use]
    pub const fn is_deletion(self) -> bool {
        self.deletion
    }

    #[must_use]
    pub const fn is_creation(self) -> bool {
        self.creation
    }
}

/// Classify a schema from its resolved name, case-insensitively.
///
/// This is a naming heuristic, not a contract: a schema called e.g. `RecreatedSchema`
/// is a creation schema.
#[must_use]
pub fn classify_schema(name: &str) -> SchemaKind {
    let name = name.to_lowercase();
    SchemaKind {
        deletion: name.contains("deleted"),
        creation: name.contains("create"),
    }
}
