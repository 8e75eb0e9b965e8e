const MAX_USERNAME_LEN: usize = 128;

trait AllowedUsernameCharacters {
    fn is_username_alphanumeric(&self) -> bool;
    fn is_username_punctuation(&self) -> bool;
    fn is_username_char(&self) -> bool {
        self.is_username_alphanumeric() || self.is_username_punctuation()
    }
}

impl AllowedUsernameCharacters for char {
    fn is_username_alphanumeric(&self) -> bool {
        let c = *self;
        c.is_ascii_lowercase() || c.is_ascii_digit()
    }

    fn is_username_punctuation(&self) -> bool {
        let c = *self;
        c == '-' || c == '.' || c == '_' || c == '+'
    }
}

/// Local part of a lightning address after lower-casing: `a-z0-9-_.+`.
pub fn check_username_valid(username: &str) -> bool {
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return false;
    }

    username.chars().all(|c| c.is_username_char())
}
