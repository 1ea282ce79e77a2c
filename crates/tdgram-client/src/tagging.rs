//! ---
//! tdg_section: "03-correlation"
//! tdg_subsection: "module"
//! tdg_type: "source"
//! tdg_scope: "code"
//! tdg_description: "Request/response correlation over a TdLib stream."
//! tdg_version: "v0.0.0-prealpha"
//! tdg_owner: "tbd"
//! ---
use tdgram_schema::Request;
use uuid::Uuid;

/// Issues `@extra` correlation tokens.
///
/// Tokens are `<instance>:<sequence>`: a random per-generator prefix keeps two
/// clients sharing one TdLib instance apart, the sequence keeps requests of one
/// client apart.
#[derive(Debug, Clone)]
pub struct ExtraGenerator {
    prefix: String,
    next_sequence: u64,
}

impl ExtraGenerator {
    /// Create a generator with a fresh random prefix.
    pub fn new() -> Self {
        Self {
            prefix: Uuid::new_v4().simple().to_string(),
            next_sequence: 0,
        }
    }

    /// Produce the next token.
    pub fn next_extra(&mut self) -> String {
        self.next_sequence = self.next_sequence.wrapping_add(1);
        format!("{}:{}", self.prefix, self.next_sequence)
    }

    /// Assign a token to `request` unless it already carries one, and return
    /// the token the request ends up with.
    pub fn tag<'r>(&mut self, request: &'r mut Request) -> &'r str {
        request.extra.get_or_insert_with(|| self.next_extra())
    }

    /// Number of tokens issued so far.
    pub fn issued(&self) -> u64 {
        self.next_sequence
    }
}

impl Default for ExtraGenerator {
    fn default() -> Self {
        Self::new()
    }
}
