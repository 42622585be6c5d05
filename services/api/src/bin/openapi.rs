//! services/api/src/bin/openapi.rs
//!
//! This binary generates the OpenAPI 3.0 specifications for both services
//! and saves them next to the workspace root.

use api_lib::web::{AdminApiDoc, ContentApiDoc};
use utoipa::OpenApi;

/// Generates the OpenAPI specification and writes it to a file.
fn generate_spec(
    api_doc: utoipa::openapi::OpenApi,
    path: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let spec_json = api_doc.to_pretty_json()?;
    std::fs::write(path, spec_json)?;
    println!("OpenAPI specification generated at {}", path);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    generate_spec(AdminApiDoc::openapi(), "admin-openapi.json")?;
    generate_spec(ContentApiDoc::openapi(), "content-openapi.json")?;
    Ok(())
}
