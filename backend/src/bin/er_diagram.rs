#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), forbid(clippy::expect_used))]
//! Print the Mermaid ER diagram derived from the entity mappings.
//!
//! ```text
//! cargo run --bin er-diagram > docs/er-diagram.mmd
//! ```

use blog_backend::domain::entity_map::schema_diagram;
use blog_backend::domain::er_diagram::render_mermaid_er_diagram;
use color_eyre::eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;
    print!("{}", render_mermaid_er_diagram(&schema_diagram()));
    Ok(())
}
