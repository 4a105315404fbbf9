/// Source of the bearer token attached to every request.
///
/// Returning `None` means there is no usable session; requests are then not
/// sent at all and fail with [`crate::error::ApiError::Auth`].
pub trait Auth {
    fn current_token(&self) -> Option<String>;
}

impl<A: Auth + ?Sized> Auth for &A {
    fn current_token(&self) -> Option<String> {
        (**self).current_token()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl Auth for StaticToken {
    fn current_token(&self) -> Option<String> {
        self.0.clone()
    }
}
