//! Local validation helpers run before any request is made

use chrono::NaiveDate;

// ============================================================================
// Line Validations
// ============================================================================

/// Validate a line quantity entered by the operator
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be greater than zero");
    }
    Ok(())
}

/// Validate a scanned or typed barcode (digits, 6-32 characters)
pub fn validate_barcode(barcode: &str) -> Result<(), &'static str> {
    let barcode = barcode.trim();
    if barcode.is_empty() {
        return Err("Barcode is required");
    }
    if barcode.len() < 6 || barcode.len() > 32 {
        return Err("Barcode must be 6 to 32 characters");
    }
    if !barcode.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Barcode must be alphanumeric");
    }
    Ok(())
}

/// Validate a batch code typed on the goods receipt screen
pub fn validate_batch_code(code: &str) -> Result<(), &'static str> {
    let code = code.trim();
    if code.is_empty() {
        return Err("Batch code is required");
    }
    if code.len() > 50 {
        return Err("Batch code must be at most 50 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("Batch code may only contain letters, digits, '-' and '_'");
    }
    Ok(())
}

/// Validate manufacture and expiry dates of a received batch
pub fn validate_batch_dates(
    manufacture_date: Option<NaiveDate>,
    expiry_date: Option<NaiveDate>,
) -> Result<(), &'static str> {
    match (manufacture_date, expiry_date) {
        (Some(mfg), Some(exp)) if exp <= mfg => {
            Err("Expiry date must be after manufacture date")
        }
        _ => Ok(()),
    }
}

// ============================================================================
// Header Validations
// ============================================================================

/// Validate the warehouse pair of a transfer
pub fn validate_warehouse_pair(source: &str, destination: &str) -> Result<(), &'static str> {
    if source.trim().is_empty() || destination.trim().is_empty() {
        return Err("Both warehouses are required");
    }
    if source == destination {
        return Err("Source and destination warehouses must differ");
    }
    Ok(())
}

/// Validate login credentials before sending them
pub fn validate_credentials(username: &str, password: &str) -> Result<(), &'static str> {
    if username.trim().is_empty() {
        return Err("Username is required");
    }
    if password.is_empty() {
        return Err("Password is required");
    }
    Ok(())
}
