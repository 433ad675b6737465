#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

#[test]
fn test_format_small_amount() {
    assert_eq!(format_amount(dec!(5)), "$5.00");
}

#[test]
fn test_format_thousands() {
    assert_eq!(format_amount(dec!(1234.5)), "$1,234.50");
}

#[test]
fn test_format_millions() {
    assert_eq!(format_amount(dec!(1234567.89)), "$1,234,567.89");
}

#[test]
fn test_format_negative() {
    assert_eq!(format_amount(dec!(-42.10)), "-$42.10");
}

#[test]
fn test_format_zero() {
    assert_eq!(format_amount(dec!(0)), "$0.00");
}

#[test]
fn test_format_rounds_extra_precision() {
    assert_eq!(format_amount(dec!(9.999)), "$10.00");
}

#[test]
fn test_current_month_shape() {
    let month = current_month();
    assert_eq!(month.len(), 7);
    assert_eq!(&month[4..5], "-");
}

#[test]
fn test_today_shape() {
    let today = today();
    assert_eq!(today.len(), 10);
}
