//! Visit attendees

/// A person present during the visit. No field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participant {
    pub name: String,
    pub phone: String,
    pub email: String,
}

impl Participant {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
        }
    }

    /// True when every field is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.phone.trim().is_empty() && self.email.trim().is_empty()
    }

    /// Non-empty fields in display order
    pub fn contact_parts(&self) -> impl Iterator<Item = &str> {
        [self.name.as_str(), self.phone.as_str(), self.email.as_str()]
            .into_iter()
            .map(str::trim)
            .filter(|part| !part.is_empty())
    }
}
