//! Explicit entity-to-table mapping metadata.
//!
//! Each persisted entity pairs its struct definition with a static
//! [`EntityMapping`] naming the backing table, the column behind every field,
//! the column's role (generated key, audit timestamp, version counter, foreign
//! key) and the relationships the entity takes part in. Persistence adapters
//! audit their schema against these tables, and [`schema_diagram`] turns them
//! into an ER diagram.

use super::er_diagram::{SchemaColumn, SchemaDiagram, SchemaRelationship, SchemaTable};

/// Role a column plays in the persistence lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Primary key assigned by the store on insert.
    PrimaryGenerated,
    /// Non-key value assigned by the store on insert.
    Generated,
    /// Set once on insert.
    CreateDate,
    /// Set on insert and on every update.
    UpdateDate,
    /// Optimistic concurrency counter.
    Version,
    /// Caller-supplied value.
    Plain,
    /// References the primary key of another table.
    ForeignKey { table: &'static str, column: &'static str },
}

/// Relationship cardinality from the declaring entity's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    OneToOne,
    OneToMany,
    ManyToOne,
}

/// Field-to-column mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub field: &'static str,
    pub column: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
    pub role: ColumnRole,
}

/// Declared relationship between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationMapping {
    pub field: &'static str,
    pub kind: RelationKind,
    pub target: &'static str,
    /// Field on the target entity that points back.
    pub inverse: &'static str,
}

/// Mapping for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMapping {
    pub entity: &'static str,
    pub table: &'static str,
    pub columns: &'static [ColumnMapping],
    pub relations: &'static [RelationMapping],
}

impl EntityMapping {
    /// Look up the column mapped to `field`.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::entity_map::POST_MAPPING;
    ///
    /// let column = POST_MAPPING.column("likeCount").expect("mapped field");
    /// assert_eq!(column.column, "like_count");
    /// ```
    pub fn column(&self, field: &str) -> Option<&'static ColumnMapping> {
        self.columns.iter().find(|column| column.field == field)
    }

    /// Column carrying the optimistic concurrency counter, if any.
    pub fn version_column(&self) -> Option<&'static ColumnMapping> {
        self.columns
            .iter()
            .find(|column| column.role == ColumnRole::Version)
    }

    /// Columns the caller supplies on insert.
    pub fn insertable_columns(&self) -> impl Iterator<Item = &'static ColumnMapping> + '_ {
        self.columns
            .iter()
            .filter(|column| matches!(column.role, ColumnRole::Plain | ColumnRole::ForeignKey { .. }))
    }
}

const fn column(
    field: &'static str,
    column: &'static str,
    sql_type: &'static str,
    role: ColumnRole,
) -> ColumnMapping {
    ColumnMapping {
        field,
        column,
        sql_type,
        nullable: false,
        role,
    }
}

/// `User` ↔ `users`.
pub const USER_MAPPING: EntityMapping = EntityMapping {
    entity: "User",
    table: "users",
    columns: &[
        column("id", "id", "uuid", ColumnRole::PrimaryGenerated),
        column("additionalId", "additional_id", "bigint", ColumnRole::Generated),
        column("nickname", "nickname", "varchar", ColumnRole::Plain),
        column("email", "email", "varchar", ColumnRole::Plain),
        column("passwordHash", "password_hash", "text", ColumnRole::Plain),
        column("createdAt", "created_at", "timestamptz", ColumnRole::CreateDate),
        column("updatedAt", "updated_at", "timestamptz", ColumnRole::UpdateDate),
        column("version", "version", "integer", ColumnRole::Version),
    ],
    relations: &[
        RelationMapping {
            field: "profile",
            kind: RelationKind::OneToOne,
            target: "Profile",
            inverse: "user",
        },
        RelationMapping {
            field: "posts",
            kind: RelationKind::OneToMany,
            target: "Post",
            inverse: "author",
        },
    ],
};

/// `Profile` ↔ `profiles`.
pub const PROFILE_MAPPING: EntityMapping = EntityMapping {
    entity: "Profile",
    table: "profiles",
    columns: &[
        column("id", "id", "bigint", ColumnRole::PrimaryGenerated),
        column(
            "userId",
            "user_id",
            "uuid",
            ColumnRole::ForeignKey {
                table: "users",
                column: "id",
            },
        ),
        ColumnMapping {
            field: "profileImage",
            column: "profile_image",
            sql_type: "text",
            nullable: true,
            role: ColumnRole::Plain,
        },
        column("createdAt", "created_at", "timestamptz", ColumnRole::CreateDate),
    ],
    relations: &[RelationMapping {
        field: "user",
        kind: RelationKind::OneToOne,
        target: "User",
        inverse: "profile",
    }],
};

/// `Post` ↔ `posts`.
pub const POST_MAPPING: EntityMapping = EntityMapping {
    entity: "Post",
    table: "posts",
    columns: &[
        column("id", "id", "bigint", ColumnRole::PrimaryGenerated),
        column(
            "authorId",
            "author_id",
            "uuid",
            ColumnRole::ForeignKey {
                table: "users",
                column: "id",
            },
        ),
        column("title", "title", "varchar", ColumnRole::Plain),
        column("content", "content", "text", ColumnRole::Plain),
        column("likeCount", "like_count", "bigint", ColumnRole::Plain),
        column("commentCount", "comment_count", "bigint", ColumnRole::Plain),
        column("createdAt", "created_at", "timestamptz", ColumnRole::CreateDate),
        column("updatedAt", "updated_at", "timestamptz", ColumnRole::UpdateDate),
        column("version", "version", "integer", ColumnRole::Version),
    ],
    relations: &[RelationMapping {
        field: "author",
        kind: RelationKind::ManyToOne,
        target: "User",
        inverse: "posts",
    }],
};

/// `Tag` ↔ `tags`.
pub const TAG_MAPPING: EntityMapping = EntityMapping {
    entity: "Tag",
    table: "tags",
    columns: &[
        column("id", "id", "bigint", ColumnRole::PrimaryGenerated),
        column("name", "name", "varchar", ColumnRole::Plain),
        column("createdAt", "created_at", "timestamptz", ColumnRole::CreateDate),
    ],
    relations: &[],
};

/// Every mapped entity, parents before children.
pub const ENTITY_MAPPINGS: [&EntityMapping; 4] =
    [&USER_MAPPING, &PROFILE_MAPPING, &POST_MAPPING, &TAG_MAPPING];

/// Build a schema snapshot from the entity mappings.
pub fn schema_diagram() -> SchemaDiagram {
    let tables = ENTITY_MAPPINGS
        .iter()
        .map(|mapping| SchemaTable {
            name: mapping.table.to_owned(),
            columns: mapping
                .columns
                .iter()
                .map(|column| SchemaColumn {
                    name: column.column.to_owned(),
                    data_type: column.sql_type.to_owned(),
                    is_primary_key: column.role == ColumnRole::PrimaryGenerated,
                    is_nullable: column.nullable,
                })
                .collect(),
        })
        .collect();

    let relationships = ENTITY_MAPPINGS
        .iter()
        .flat_map(|mapping| {
            mapping.columns.iter().filter_map(move |column| match column.role {
                ColumnRole::ForeignKey { table, column: referenced } => Some(SchemaRelationship {
                    referencing_table: mapping.table.to_owned(),
                    referencing_column: column.column.to_owned(),
                    referenced_table: table.to_owned(),
                    referenced_column: referenced.to_owned(),
                    referencing_is_nullable: column.nullable,
                }),
                _ => None,
            })
        })
        .collect();

    SchemaDiagram {
        tables,
        relationships,
    }
}
