use super::macros::string_id;

string_id!(
    /// Authenticated user identity as supplied by the identity provider.
    UserId
);
