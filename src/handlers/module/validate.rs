use crate::database::ModuleRecord;
use crate::error::ModuleError;

pub const NAME_MIN_LEN: usize = 1;
pub const NAME_MAX_LEN: usize = 100;

pub const ID_REQUIRED: &str = "id must not be null";
pub const NAME_LENGTH: &str = "name length must be between 1 and 100 characters";
pub const ORDER_NO_REQUIRED: &str = "orderNo must not be null";
pub const PARENT_ID_REQUIRED: &str = "parentId must not be null";

/// Check a submitted module; the first failing rule wins.
///
/// Returns the validated id.
pub fn validate(module: &ModuleRecord) -> Result<&str, ModuleError> {
    let id = module.id.as_deref().ok_or_else(|| ModuleError::validation(ID_REQUIRED))?;
    if !valid_length(NAME_MIN_LEN, NAME_MAX_LEN, module.name.as_deref()) {
        return Err(ModuleError::validation(NAME_LENGTH));
    }
    if module.order_no.is_none() {
        return Err(ModuleError::validation(ORDER_NO_REQUIRED));
    }
    if module.parent_id.is_none() {
        return Err(ModuleError::validation(PARENT_ID_REQUIRED));
    }
    Ok(id)
}

/// Character count of `value` within `[min, max]`; a missing value never is.
pub fn valid_length(min: usize, max: usize, value: Option<&str>) -> bool {
    value.map_or(false, |v| (min..=max).contains(&v.chars().count()))
}
