use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ImsccError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ImsccError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ImsccError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(ImsccError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ImsccError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Extensions are written with their leading dot, e.g. `.xml`.
pub fn validate_extension_list(field_name: &str, extensions: &[String]) -> Result<()> {
    if extensions.is_empty() {
        return Err(ImsccError::MissingConfigError {
            field: field_name.to_string(),
        });
    }

    for ext in extensions {
        if ext.len() < 2 || !ext.starts_with('.') {
            return Err(ImsccError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: ext.clone(),
                reason: "Extension must start with '.' followed by at least one character"
                    .to_string(),
            });
        }
    }

    Ok(())
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_path("archive.manifest_entry", config.manifest_entry())?;
    validate_non_empty_string("archive.module_marker", config.module_marker())?;
    validate_extension_list("archive.descriptor_extensions", config.descriptor_extensions())?;
    validate_positive_number(
        "archive.concurrent_reads",
        config.concurrent_reads() as u64,
        1,
    )?;
    validate_extension_list("upload.accepted_extensions", config.accepted_extensions())?;
    validate_positive_number("upload.max_file_size", config.max_upload_bytes(), 1)?;

    if let Some(output) = config.output_path() {
        validate_path("output.path", output)?;
    }

    Ok(())
}

/// Extension of an uploaded file as `.ext`, lowercased; the whole name when it has no dot.
pub fn upload_extension(file_name: &str) -> String {
    let last = file_name.rsplit('.').next().unwrap_or(file_name);
    format!(".{}", last.to_lowercase())
}

pub fn validate_upload_type(file_name: &str, accepted_extensions: &[String]) -> Result<()> {
    let extension = upload_extension(file_name);
    if accepted_extensions
        .iter()
        .any(|accepted| accepted.to_lowercase() == extension)
    {
        return Ok(());
    }

    Err(ImsccError::ValidationError {
        message: format!(
            "Invalid file type. Accepted types: {}",
            accepted_extensions.join(", ")
        ),
    })
}

pub fn validate_upload_size(size: u64, max_bytes: u64) -> Result<()> {
    if size > max_bytes {
        return Err(ImsccError::ValidationError {
            message: format!(
                "File is too large. Maximum size: {}MB",
                max_bytes as f64 / (1024.0 * 1024.0)
            ),
        });
    }
    Ok(())
}

/// Rejects uploads with an unexpected extension or above the size limit.
pub fn validate_upload(
    file_name: &str,
    size: u64,
    accepted_extensions: &[String],
    max_bytes: u64,
) -> Result<()> {
    validate_upload_type(file_name, accepted_extensions)?;
    validate_upload_size(size, max_bytes)
}
