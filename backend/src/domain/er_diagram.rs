//! Schema snapshots and their Mermaid ER rendering.
//!
//! The snapshot is built from [`super::entity_map`] so the diagram always
//! reflects the declared entity mappings rather than a live database.

use std::fmt;

/// A full schema snapshot used for ER diagram rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDiagram {
    pub tables: Vec<SchemaTable>,
    pub relationships: Vec<SchemaRelationship>,
}

impl SchemaDiagram {
    /// Return a stable, deterministically ordered clone of the diagram.
    ///
    /// # Examples
    ///
    /// ```
    /// use blog_backend::domain::er_diagram::{SchemaDiagram, SchemaTable};
    ///
    /// let diagram = SchemaDiagram {
    ///     tables: vec![
    ///         SchemaTable { name: "users".to_owned(), columns: vec![] },
    ///         SchemaTable { name: "posts".to_owned(), columns: vec![] },
    ///     ],
    ///     relationships: vec![],
    /// };
    ///
    /// assert_eq!(diagram.normalized().tables[0].name, "posts");
    /// ```
    pub fn normalized(&self) -> Self {
        let mut tables = self.tables.clone();
        for table in &mut tables {
            table.columns.sort_by(|a, b| a.name.cmp(&b.name));
        }
        tables.sort_by(|a, b| a.name.cmp(&b.name));

        let mut relationships = self.relationships.clone();
        relationships.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        Self {
            tables,
            relationships,
        }
    }
}

/// A database table with typed columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaTable {
    pub name: String,
    pub columns: Vec<SchemaColumn>,
}

/// A typed database column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    pub name: String,
    pub data_type: String,
    pub is_primary_key: bool,
    pub is_nullable: bool,
}

/// A single foreign-key relationship between two columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRelationship {
    pub referencing_table: String,
    pub referencing_column: String,
    pub referenced_table: String,
    pub referenced_column: String,
    pub referencing_is_nullable: bool,
}

impl SchemaRelationship {
    fn sort_key(&self) -> (&str, &str, &str, &str) {
        (
            &self.referenced_table,
            &self.referencing_table,
            &self.referenced_column,
            &self.referencing_column,
        )
    }
}

/// Render a Mermaid ER diagram from a schema snapshot.
///
/// # Examples
///
/// ```
/// use blog_backend::domain::entity_map::schema_diagram;
/// use blog_backend::domain::er_diagram::render_mermaid_er_diagram;
///
/// let rendered = render_mermaid_er_diagram(&schema_diagram());
/// assert!(rendered.starts_with("erDiagram\n"));
/// assert!(rendered.contains("Users ||--|{ Posts"));
/// ```
pub fn render_mermaid_er_diagram(diagram: &SchemaDiagram) -> String {
    MermaidEr(&diagram.normalized()).to_string()
}

/// Display adapter writing a normalized diagram in Mermaid syntax.
struct MermaidEr<'a>(&'a SchemaDiagram);

impl fmt::Display for MermaidEr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "erDiagram")?;
        for table in &self.0.tables {
            write_entity(f, table)?;
        }
        for relationship in &self.0.relationships {
            write_relationship(f, relationship)?;
        }
        Ok(())
    }
}

fn write_entity(f: &mut fmt::Formatter<'_>, table: &SchemaTable) -> fmt::Result {
    writeln!(f, "  {} {{", entity_name(&table.name))?;
    for column in &table.columns {
        let marker = if column.is_primary_key { " PK" } else { "" };
        writeln!(
            f,
            "    {} {}{marker}",
            mermaid_type(&column.data_type),
            column.name
        )?;
    }
    writeln!(f, "  }}\n")
}

fn write_relationship(f: &mut fmt::Formatter<'_>, relationship: &SchemaRelationship) -> fmt::Result {
    // Nullable foreign keys allow zero children; required ones at least one.
    let cardinality = if relationship.referencing_is_nullable {
        "||--o{"
    } else {
        "||--|{"
    };
    writeln!(
        f,
        "  {} {cardinality} {} : \"{} -> {}\"",
        entity_name(&relationship.referenced_table),
        entity_name(&relationship.referencing_table),
        relationship.referencing_column,
        relationship.referenced_column,
    )
}

/// `profile_images` becomes `ProfileImages`.
fn entity_name(table: &str) -> String {
    let name: String = table
        .split('_')
        .filter_map(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
        })
        .collect();
    if name.is_empty() { table.to_owned() } else { name }
}

/// Reduce a SQL type name to a Mermaid attribute type identifier.
fn mermaid_type(data_type: &str) -> String {
    let words: Vec<String> = data_type
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();
    if words.is_empty() {
        "unknown".to_owned()
    } else {
        words.join("_")
    }
}
