// Receipt numbering: `PPP-NNNN`, strictly increasing per prefix.

use lavado::invoices::models::DEFAULT_INVOICE_PREFIX;
use lavado::invoices::InvoiceNumber;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_display_parses_back(prefix in "[0-9]{3}", sequence in 1u32..1_000_000) {
        let number = InvoiceNumber::new(&prefix, sequence).unwrap();
        let text = number.to_string();

        let expected_prefix = format!("{}-", prefix);
        prop_assert!(text.starts_with(&expected_prefix));
        prop_assert!(text.len() >= 8);
        prop_assert_eq!(text.parse::<InvoiceNumber>().unwrap(), number);
    }

    #[test]
    fn prop_next_number_sorts_after(last in 0u32..100_000) {
        let current = InvoiceNumber::after(DEFAULT_INVOICE_PREFIX, last).unwrap();
        let next = InvoiceNumber::after(DEFAULT_INVOICE_PREFIX, current.sequence()).unwrap();

        prop_assert_eq!(next.sequence(), current.sequence() + 1);
        prop_assert!(next > current);
    }

    #[test]
    fn prop_four_digit_numbers_sort_as_text(a in 1u32..10_000, b in 1u32..10_000) {
        let a = InvoiceNumber::new(DEFAULT_INVOICE_PREFIX, a).unwrap();
        let b = InvoiceNumber::new(DEFAULT_INVOICE_PREFIX, b).unwrap();

        prop_assert_eq!(a.cmp(&b), a.to_string().cmp(&b.to_string()));
    }
}

#[test]
fn test_first_number() {
    let first = InvoiceNumber::after(DEFAULT_INVOICE_PREFIX, 0).unwrap();
    assert_eq!(first.to_string(), "001-0001");
}

#[test]
fn test_rollover_past_9999() {
    let number = InvoiceNumber::after("001", 9_999).unwrap();
    assert_eq!(number.to_string(), "001-10000");
}

#[test]
fn test_exhausted_sequence() {
    assert!(InvoiceNumber::after("001", u32::MAX).is_err());
}

#[test]
fn test_prefix_must_be_three_digits() {
    assert!(InvoiceNumber::new("01", 1).is_err());
    assert!(InvoiceNumber::new("A01", 1).is_err());
    assert!(InvoiceNumber::new("0001", 1).is_err());
    assert!(InvoiceNumber::new("001", 0).is_err());
}
