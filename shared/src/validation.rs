//! Validation utilities for the Slab Marketplace Platform
//!
//! Includes Brazil-specific validations for the ornamental stone market.

// ============================================================================
// Batch Validations
// ============================================================================

/// Validate batch code format (3-16 uppercase alphanumeric with dashes)
pub fn validate_batch_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 3 {
        return Err("Batch code must be at least 3 characters");
    }
    if code.len() > 16 {
        return Err("Batch code must be at most 16 characters");
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err("Batch code must be uppercase alphanumeric (dashes allowed)");
    }
    Ok(())
}

/// Validate slab dimensions are positive and physically plausible (cm)
pub fn validate_dimensions(height_cm: f64, width_cm: f64, thickness_cm: f64) -> Result<(), &'static str> {
    if height_cm <= 0.0 || width_cm <= 0.0 || thickness_cm <= 0.0 {
        return Err("Dimensions must be positive");
    }
    if height_cm > 1000.0 || width_cm > 1000.0 {
        return Err("Slab dimensions exceed plausible maximum");
    }
    if thickness_cm > 30.0 {
        return Err("Slab thickness exceeds plausible maximum");
    }
    Ok(())
}

/// Validate a price in minor units is positive
pub fn validate_price_cents(price_cents: i64) -> Result<(), &'static str> {
    if price_cents <= 0 {
        return Err("Price must be positive");
    }
    Ok(())
}

/// Validate a slab quantity is positive
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate industry code format (2-8 uppercase alphanumeric)
pub fn validate_industry_code(code: &str) -> Result<(), &'static str> {
    if code.len() < 2 {
        return Err("Industry code must be at least 2 characters");
    }
    if code.len() > 8 {
        return Err("Industry code must be at most 8 characters");
    }
    if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
        return Err("Industry code must be uppercase alphanumeric only");
    }
    Ok(())
}

// ============================================================================
// Brazil-Specific Validations
// ============================================================================

/// Validate Brazilian phone number format
/// Accepts: 2799998888, (27) 9999-8888, +5527999998888
pub fn validate_brazilian_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Landline: DDD + 8 digits; mobile: DDD + 9 digits
    if digits.len() == 10 || digits.len() == 11 {
        return Ok(());
    }
    // International format with country code 55
    if (digits.len() == 12 || digits.len() == 13) && digits.starts_with("55") {
        return Ok(());
    }

    Err("Invalid Brazilian phone number format")
}

/// Validate Brazilian CNPJ (company tax ID)
/// 14-digit number with two mod-11 check digits
pub fn validate_cnpj(cnpj: &str) -> Result<(), &'static str> {
    let digits: Vec<u32> = cnpj.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 14 {
        return Err("CNPJ must be 14 digits");
    }

    let check = |len: usize| -> u32 {
        // Weights cycle 2..=9 from the rightmost position
        let mut sum = 0;
        let mut weight = 2;
        for i in (0..len).rev() {
            sum += digits[i] * weight;
            weight = if weight == 9 { 2 } else { weight + 1 };
        }
        let d = 11 - (sum % 11);
        if d >= 10 {
            0
        } else {
            d
        }
    };

    if check(12) != digits[12] || check(13) != digits[13] {
        return Err("Invalid CNPJ checksum");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Batch Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_batch_code_valid() {
        assert!(validate_batch_code("BR-GRA-0042").is_ok());
        assert!(validate_batch_code("VIX001").is_ok());
    }

    #[test]
    fn test_validate_batch_code_invalid() {
        assert!(validate_batch_code("AB").is_err()); // Too short
        assert!(validate_batch_code("ABCDEFGHIJKLMNOPQ").is_err()); // Too long
        assert!(validate_batch_code("br-gra-1").is_err()); // Lowercase
        assert!(validate_batch_code("BR_GRA").is_err()); // Underscore
    }

    #[test]
    fn test_validate_dimensions() {
        assert!(validate_dimensions(300.0, 180.0, 2.0).is_ok());
        assert!(validate_dimensions(0.0, 180.0, 2.0).is_err());
        assert!(validate_dimensions(300.0, -1.0, 2.0).is_err());
        assert!(validate_dimensions(300.0, 180.0, 0.0).is_err());
        assert!(validate_dimensions(1500.0, 180.0, 2.0).is_err());
        assert!(validate_dimensions(300.0, 180.0, 45.0).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(40_000).is_ok());
        assert!(validate_price_cents(0).is_err());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(10).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.com.br").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_industry_code() {
        assert!(validate_industry_code("VIX").is_ok());
        assert!(validate_industry_code("CK7").is_ok());
        assert!(validate_industry_code("A").is_err());
        assert!(validate_industry_code("vix").is_err());
        assert!(validate_industry_code("ABCDEFGHI").is_err());
    }

    // ========================================================================
    // Brazil-Specific Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_brazilian_phone_valid() {
        // Mobile with DDD
        assert!(validate_brazilian_phone("27999998888").is_ok());
        // Landline with DDD
        assert!(validate_brazilian_phone("2733334444").is_ok());
        // Formatted
        assert!(validate_brazilian_phone("(27) 99999-8888").is_ok());
        // International format
        assert!(validate_brazilian_phone("+5527999998888").is_ok());
    }

    #[test]
    fn test_validate_brazilian_phone_invalid() {
        assert!(validate_brazilian_phone("12345").is_err());
        assert!(validate_brazilian_phone("999999888877665").is_err());
        assert!(validate_brazilian_phone("abcdefghij").is_err());
    }

    #[test]
    fn test_validate_cnpj_valid() {
        assert!(validate_cnpj("11222333000181").is_ok());
        assert!(validate_cnpj("11.222.333/0001-81").is_ok());
    }

    #[test]
    fn test_validate_cnpj_invalid() {
        // Wrong length
        assert!(validate_cnpj("112223330001").is_err());
        // Bad check digits
        assert!(validate_cnpj("11222333000180").is_err());
        assert!(validate_cnpj("11222333000191").is_err());
    }
}
