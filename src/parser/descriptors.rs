// Descriptor interchange
//
// Descriptors can be extracted once and stored as JSON, so the generators
// can run from literal data instead of re-parsing sources.

use crate::error::{Error, Result};
use crate::parser::ast::TypeDescriptor;
use std::fs;
use std::path::Path;

/// Load descriptors from a JSON array file
pub fn load_json(path: &Path) -> Result<Vec<TypeDescriptor>> {
    if !path.exists() {
        return Err(Error::PathNotFound(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)?;
    let types: Vec<TypeDescriptor> = serde_json::from_str(&contents)?;
    Ok(types)
}

/// Save descriptors as a pretty-printed JSON array
pub fn save_json(path: &Path, types: &[TypeDescriptor]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::output(parent, e))?;
    }
    let json = serde_json::to_string_pretty(types)?;
    fs::write(path, json).map_err(|e| Error::output(path, e))?;
    Ok(())
}
