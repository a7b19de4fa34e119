//! Small XML emission helpers shared by the document builders.

use rust_decimal::{Decimal, RoundingStrategy};

/// Escapes the five XML metacharacters. Ampersand first, so already-escaped
/// entities are not double-mangled into `&amp;amp;`.
pub fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Currency as the schema wants it: a signed whole-dollar integer, halves
/// rounding away from zero.
pub fn format_amount(amount: Decimal) -> String {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_string()
}

pub(crate) fn elem(out: &mut String, name: &str, value: &str) {
    out.push('<');
    out.push_str(name);
    out.push('>');
    out.push_str(value);
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Element with escaped text content.
pub(crate) fn text_elem(out: &mut String, name: &str, value: &str) {
    elem(out, name, &escape_xml(value));
}

/// Element with whole-dollar currency content.
pub(crate) fn amount_elem(out: &mut String, name: &str, amount: Decimal) {
    elem(out, name, &format_amount(amount));
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn escapes_all_five_metacharacters() {
        assert_eq!(
            escape_xml(r#"A & B <C> "D" 'E'"#),
            "A &amp; B &lt;C&gt; &quot;D&quot; &apos;E&apos;"
        );
    }

    #[test]
    fn ampersand_is_escaped_before_the_rest() {
        assert_eq!(escape_xml("&lt;"), "&amp;lt;");
    }

    #[test]
    fn amounts_are_whole_signed_integers() {
        assert_eq!(format_amount(dec!(50000)), "50000");
        assert_eq!(format_amount(dec!(1234.50)), "1235");
        assert_eq!(format_amount(dec!(1234.49)), "1234");
        assert_eq!(format_amount(dec!(-2500.50)), "-2501");
        assert_eq!(format_amount(dec!(0)), "0");
    }

    #[test]
    fn elements_nest_without_whitespace() {
        let mut out = String::new();
        text_elem(&mut out, "CityNm", "FORT WAYNE");
        amount_elem(&mut out, "WagesAmt", dec!(50000));
        assert_eq!(
            out,
            "<CityNm>FORT WAYNE</CityNm><WagesAmt>50000</WagesAmt>"
        );
    }
}
