//! Optional contact details collected at signup

use super::ValidationError;

const MAX_FIELD_LEN: usize = 128;

/// Name, email and phone for a user. Blank form fields become `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

fn optional(value: Option<&str>, field: &'static str) -> Result<Option<String>, ValidationError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > MAX_FIELD_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_FIELD_LEN,
        });
    }
    Ok(Some(value.to_owned()))
}

impl ContactDetails {
    pub fn new(
        first_name: Option<&str>,
        last_name: Option<&str>,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let email = optional(email, "email")?;
        if let Some(email) = &email {
            if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
                return Err(ValidationError::InvalidFormat {
                    field: "email",
                    reason: "must be an email address",
                });
            }
        }

        Ok(Self {
            first_name: optional(first_name, "first name")?,
            last_name: optional(last_name, "last name")?,
            email,
            phone_number: optional(phone_number, "phone number")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blanks_become_none() {
        let details = ContactDetails::new(Some(" "), None, Some(""), Some("\t")).unwrap();
        assert_eq!(details, ContactDetails::default());
    }

    #[test]
    fn keeps_trimmed_values() {
        let details =
            ContactDetails::new(Some(" Ada "), Some("Lovelace"), Some("ada@example.com"), None)
                .unwrap();
        assert_eq!(details.first_name.as_deref(), Some("Ada"));
        assert_eq!(details.email.as_deref(), Some("ada@example.com"));
        assert!(details.phone_number.is_none());
    }

    #[test]
    fn rejects_bad_email() {
        for bad in ["ada", "@example.com", "ada@"] {
            let err = ContactDetails::new(None, None, Some(bad), None).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidFormat { field: "email", .. }));
        }
    }
}
