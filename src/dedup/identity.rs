/// Computes the identity key used to detect duplicate items.
///
/// The key is order-independent on host tokens (sorted before joining)
/// and fixed-format on the login fields:
/// `<username>_<password>_<token>|<token>|...`.
pub fn identity_key(username: &str, password: &str, host_tokens: &[String]) -> String {
    let mut sorted = host_tokens.to_vec();
    sorted.sort();
    format!("{}_{}_{}", username, password, sorted.join("|"))
}
