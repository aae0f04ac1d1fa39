use derive_more::Display;

pub const TERMINATOR: char = ';';

/// A model-generated statement after normalization. Untrusted: nothing about
/// its content has been checked.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Display)]
pub struct GeneratedStatement(String);

impl GeneratedStatement {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for GeneratedStatement {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trim the raw completion and make it end with exactly one terminator.
///
/// No parsing happens here. Empty input becomes `";"` and is left for the
/// executor to refuse.
pub fn normalize(raw: &str) -> GeneratedStatement {
    let body = raw
        .trim()
        .trim_end_matches(|c: char| c == TERMINATOR || c.is_whitespace());
    let mut statement = String::with_capacity(body.len() + 1);
    statement.push_str(body);
    statement.push(TERMINATOR);
    GeneratedStatement(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("  SELECT * FROM Customers  ", "SELECT * FROM Customers;")]
    #[case("SELECT 1;", "SELECT 1;")]
    #[case("\n\tSELECT 1;\n", "SELECT 1;")]
    #[case("SELECT 1;;", "SELECT 1;")]
    #[case("SELECT 1 ; ;  ", "SELECT 1;")]
    #[case("SELECT ';'", "SELECT ';';")]
    #[case("Here is the query: SELECT 1", "Here is the query: SELECT 1;")]
    fn normalizes(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(raw).as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t \r\n")]
    #[case(";")]
    #[case(" ; ;")]
    fn empty_becomes_bare_terminator(#[case] raw: &str) {
        assert_eq!(normalize(raw).as_str(), ";");
    }

    #[rstest]
    #[case("SELECT * FROM Customers")]
    #[case("  select count(*) from Orders;  ")]
    #[case("")]
    #[case("DELETE FROM Orders;;\n")]
    fn ends_with_one_terminator_and_is_idempotent(#[case] raw: &str) {
        let once = normalize(raw);
        assert!(once.as_str().ends_with(TERMINATOR));
        assert!(!once.as_str().ends_with(";;"));
        assert_eq!(normalize(once.as_str()), once);
    }

    #[test]
    fn keeps_interior_text_untouched() {
        let raw = "SELECT name  FROM   Customers WHERE city = ' Delhi '";
        assert_eq!(normalize(raw).to_string(), format!("{raw};"));
    }
}
