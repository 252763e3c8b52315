//! # Validation Module
//!
//! Input validation for cart operations, checkout and registration.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI argument parsing (clap)                                  │
//! │  ├── Types and required flags                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Single-field validators → ValidationError                         │
//! │  └── Form validators → ValidationErrors (every failure, in order)      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Primary keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use aali_core::validation::{validate_phone, validate_quantity};
//!
//! validate_phone("9876543210").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::{ValidationError, ValidationErrors};
use crate::money::Money;
use crate::types::{CheckoutForm, CustomerInfo, PaymentDetails, PaymentMethod};
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Minimum password length at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity (1..=99).
///
/// ## Example
/// ```rust
/// use aali_core::validation::validate_quantity;
///
/// assert!(validate_quantity(1).is_ok());
/// assert!(validate_quantity(99).is_ok());
/// assert!(validate_quantity(0).is_err());
/// assert!(validate_quantity(100).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price. Zero is allowed.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// Field Validators
// =============================================================================

fn is_digits(value: &str, len: usize, first: std::ops::RangeInclusive<char>) -> bool {
    value.len() == len
        && value.chars().all(|c| c.is_ascii_digit())
        && value.chars().next().is_some_and(|c| first.contains(&c))
}

/// Requires a non-blank value.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Indian mobile number: 10 digits starting with 6-9.
///
/// ```rust
/// use aali_core::validation::validate_phone;
///
/// assert!(validate_phone("9876543210").is_ok());
/// assert!(validate_phone("5876543210").is_err());
/// assert!(validate_phone("98765").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    if !is_digits(phone.trim(), 10, '6'..='9') {
        return Err(ValidationError::invalid_format(
            "mobile number",
            "must be 10 digits starting with 6-9",
        ));
    }
    Ok(())
}

/// PIN code: 6 digits, not starting with 0.
pub fn validate_pincode(pincode: &str) -> ValidationResult<()> {
    if !is_digits(pincode.trim(), 6, '1'..='9') {
        return Err(ValidationError::invalid_format(
            "pincode",
            "must be 6 digits",
        ));
    }
    Ok(())
}

/// Aadhaar number: 12 digits starting with 2-9.
pub fn validate_aadhaar(aadhaar: &str) -> ValidationResult<()> {
    if !is_digits(aadhaar.trim(), 12, '2'..='9') {
        return Err(ValidationError::invalid_format(
            "Aadhaar number",
            "must be 12 digits and valid",
        ));
    }
    Ok(())
}

/// Email shaped like `local@domain.tld`, no whitespace.
///
/// ```rust
/// use aali_core::validation::validate_email;
///
/// assert!(validate_email("asha@example.in").is_ok());
/// assert!(validate_email("asha@example").is_err());
/// assert!(validate_email("a sha@example.in").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::invalid_format("email address", "expected name@domain.tld");
    let email = email.trim();

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }
    // at least one dot with text on both sides, somewhere in the domain
    let has_dotted_part = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if !has_dotted_part {
        return Err(invalid());
    }
    Ok(())
}

/// UPI id such as `name@bank`.
pub fn validate_upi_id(upi_id: &str) -> ValidationResult<()> {
    let upi_id = upi_id.trim();
    validate_required("UPI ID", upi_id)?;
    match upi_id.split_once('@') {
        Some((user, handle)) if !user.is_empty() && !handle.is_empty() => Ok(()),
        _ => Err(ValidationError::invalid_format(
            "UPI ID",
            "expected name@bank",
        )),
    }
}

/// Card number: 13-19 digits once spaces and dashes are removed.
///
/// Returns the last four digits, which is all that is ever kept.
pub fn validate_card_number(card_number: &str) -> ValidationResult<String> {
    let digits: String = card_number
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    if digits.is_empty() {
        return Err(ValidationError::required("card number"));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) || !(13..=19).contains(&digits.len()) {
        return Err(ValidationError::invalid_format(
            "card number",
            "must be 13 to 19 digits",
        ));
    }
    Ok(digits[digits.len() - 4..].to_string())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates method-specific payment fields and keeps only what an order needs.
pub fn validate_payment(
    method: PaymentMethod,
    form: &CheckoutForm,
) -> Result<PaymentDetails, ValidationError> {
    let mut details = PaymentDetails::new(method);
    match method {
        PaymentMethod::Upi => {
            validate_upi_id(&form.upi_id)?;
            details.upi_id = Some(form.upi_id.trim().to_string());
        }
        PaymentMethod::NetBanking => {
            validate_required("bank name", &form.bank_name)?;
            details.bank_name = Some(form.bank_name.trim().to_string());
        }
        PaymentMethod::Card => {
            details.card_last4 = Some(validate_card_number(&form.card_number)?);
            details.card_type = Some(PaymentMethod::Card.label().to_string());
        }
        PaymentMethod::Cod => {
            details.cod_charges = Some(PaymentMethod::COD_CHARGE);
        }
    }
    Ok(details)
}

/// Validates the whole checkout form, collecting every failure.
///
/// ## Rules
/// - name, phone, address, pincode, payment method are required
/// - phone, pincode format always checked when present
/// - email and Aadhaar are optional but checked when given
/// - payment details checked for the chosen method
///
/// On success the Aadhaar is already masked in the returned customer.
pub fn validate_checkout(
    form: &CheckoutForm,
) -> Result<(CustomerInfo, PaymentDetails), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_required("Full name", &form.name));
    match validate_required("Mobile number", &form.phone) {
        Ok(()) => errors.check(validate_phone(&form.phone)),
        Err(e) => errors.push(e),
    }
    if !form.email.trim().is_empty() {
        errors.check(validate_email(&form.email));
    }
    errors.check(validate_required("Address", &form.address));
    match validate_required("Pincode", &form.pincode) {
        Ok(()) => errors.check(validate_pincode(&form.pincode)),
        Err(e) => errors.push(e),
    }
    if !form.aadhaar.trim().is_empty() {
        errors.check(validate_aadhaar(&form.aadhaar));
    }

    let payment = match validate_required("Payment method", &form.payment_method) {
        Err(e) => {
            errors.push(e);
            None
        }
        Ok(()) => match form.payment_method.parse::<PaymentMethod>() {
            Err(e) => {
                errors.push(e);
                None
            }
            Ok(method) => match validate_payment(method, form) {
                Ok(details) => Some(details),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
        },
    };

    match payment {
        Some(payment) if errors.is_empty() => Ok((customer_from_form(form), payment)),
        _ => Err(errors),
    }
}

fn customer_from_form(form: &CheckoutForm) -> CustomerInfo {
    let optional = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };
    CustomerInfo {
        name: form.name.trim().to_string(),
        phone: form.phone.trim().to_string(),
        email: optional(&form.email),
        address: form.address.trim().to_string(),
        pincode: form.pincode.trim().to_string(),
        aadhaar_masked: optional(&form.aadhaar).map(|a| crate::order::mask_aadhaar(&a)),
    }
}

/// Validates a registration: every field present, passwords match and are
/// at least six characters.
pub fn validate_registration(
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check(validate_required("Name", name));
    match validate_required("Email", email) {
        Ok(()) => errors.check(validate_email(email)),
        Err(e) => errors.push(e),
    }
    errors.check(validate_required("Phone", phone));
    errors.check(validate_required("Password", password));
    errors.check(validate_required("Confirm password", confirm_password));

    if !password.is_empty() && !confirm_password.is_empty() {
        if password != confirm_password {
            errors.push(ValidationError::Mismatch {
                field: "Passwords".to_string(),
            });
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            errors.push(ValidationError::TooShort {
                field: "Password".to_string(),
                min: MIN_PASSWORD_LEN,
            });
        }
    }

    errors.into_result()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            name: "Asha Verma".to_string(),
            phone: "9876543210".to_string(),
            email: "asha@example.in".to_string(),
            address: "12 MG Road, Jaipur".to_string(),
            pincode: "302001".to_string(),
            aadhaar: "234567891234".to_string(),
            payment_method: "upi".to_string(),
            upi_id: "asha@okbank".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_rupees(0)).is_ok());
        assert!(validate_price(Money::from_rupees(125_000)).is_ok());
        assert!(validate_price(Money::from_rupees(-1)).is_err());
    }

    #[rstest]
    #[case("9876543210", true)]
    #[case("6000000000", true)]
    #[case("5876543210", false)]
    #[case("987654321", false)]
    #[case("98765432101", false)]
    #[case("98765x3210", false)]
    fn test_validate_phone(#[case] phone: &str, #[case] ok: bool) {
        assert_eq!(validate_phone(phone).is_ok(), ok);
    }

    #[rstest]
    #[case("302001", true)]
    #[case("012345", false)]
    #[case("30200", false)]
    fn test_validate_pincode(#[case] pincode: &str, #[case] ok: bool) {
        assert_eq!(validate_pincode(pincode).is_ok(), ok);
    }

    #[rstest]
    #[case("234567891234", true)]
    #[case("123456789012", false)]
    #[case("23456789123", false)]
    fn test_validate_aadhaar(#[case] aadhaar: &str, #[case] ok: bool) {
        assert_eq!(validate_aadhaar(aadhaar).is_ok(), ok);
    }

    #[rstest]
    #[case("asha@example.in", true)]
    #[case("a.b@mail.co.in", true)]
    #[case("asha@example", false)]
    #[case("@example.in", false)]
    #[case("asha@@example.in", false)]
    #[case("asha example@x.in", false)]
    #[case("asha@.in", false)]
    fn test_validate_email(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(validate_email(email).is_ok(), ok);
    }

    #[test]
    fn test_card_keeps_last_four() {
        assert_eq!(validate_card_number("4111 1111 1111 1111").unwrap(), "1111");
        assert_eq!(validate_card_number("4000-0566-5566-5556").unwrap(), "5556");
        assert!(validate_card_number("4111").is_err());
        assert!(validate_card_number("").is_err());
        assert!(validate_card_number("4111 1111 1111 111a").is_err());
    }

    #[test]
    fn test_validate_checkout_ok() {
        let (customer, payment) = validate_checkout(&valid_form()).unwrap();
        assert_eq!(customer.name, "Asha Verma");
        assert_eq!(customer.aadhaar_masked.as_deref(), Some("XXXX-XXXX-1234"));
        assert_eq!(payment.method, PaymentMethod::Upi);
        assert_eq!(payment.upi_id.as_deref(), Some("asha@okbank"));
    }

    #[test]
    fn test_validate_checkout_optional_fields() {
        let form = CheckoutForm {
            email: String::new(),
            aadhaar: String::new(),
            payment_method: "cod".to_string(),
            ..valid_form()
        };
        let (customer, payment) = validate_checkout(&form).unwrap();
        assert!(customer.email.is_none());
        assert!(customer.aadhaar_masked.is_none());
        assert_eq!(payment.cod_charges, Some(PaymentMethod::COD_CHARGE));
    }

    #[test]
    fn test_validate_checkout_collects_all_errors() {
        let form = CheckoutForm {
            name: " ".to_string(),
            phone: "12345".to_string(),
            pincode: String::new(),
            aadhaar: "1111".to_string(),
            payment_method: "netbanking".to_string(),
            bank_name: String::new(),
            ..valid_form()
        };
        let errors = validate_checkout(&form).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.errors()[0], ValidationError::required("Full name"));
        assert_eq!(errors.errors()[2], ValidationError::required("Pincode"));
    }

    #[test]
    fn test_validate_checkout_card_details() {
        let form = CheckoutForm {
            payment_method: "card".to_string(),
            card_number: "4111111111111111".to_string(),
            ..valid_form()
        };
        let (_, payment) = validate_checkout(&form).unwrap();
        assert_eq!(payment.card_last4.as_deref(), Some("1111"));
        assert!(payment.upi_id.is_none());
    }

    #[test]
    fn test_validate_checkout_unknown_method() {
        let form = CheckoutForm {
            payment_method: "barter".to_string(),
            ..valid_form()
        };
        let errors = validate_checkout(&form).unwrap_err();
        assert!(matches!(errors.errors()[0], ValidationError::NotAllowed { .. }));
    }

    #[test]
    fn test_validate_registration() {
        assert!(validate_registration("Asha", "asha@x.in", "9876543210", "secret1", "secret1").is_ok());

        let errors = validate_registration("Asha", "asha@x.in", "9876543210", "secret1", "secret2")
            .unwrap_err();
        assert_eq!(
            errors.errors(),
            &[ValidationError::Mismatch {
                field: "Passwords".to_string()
            }]
        );

        let errors =
            validate_registration("Asha", "asha@x.in", "9876543210", "abc", "abc").unwrap_err();
        assert!(matches!(errors.errors()[0], ValidationError::TooShort { min: 6, .. }));

        let errors = validate_registration("", "", "", "", "").unwrap_err();
        assert_eq!(errors.len(), 5);
    }
}
