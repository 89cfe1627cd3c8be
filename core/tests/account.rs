//! Account tests — whole-number balance bookkeeping.

use martingale_core::account::Account;

#[test]
fn add_and_subtract_return_new_balance() {
    let mut account = Account::new(100);
    assert_eq!(account.add(25.0), 125);
    assert_eq!(account.subtract(30.0), 95);
    assert_eq!(account.balance(), 95);
}

#[test]
fn fractional_amounts_are_truncated() {
    let mut account = Account::new(10);
    account.add(1.5);
    assert_eq!(account.balance(), 11, "1.5 should be credited as 1");
    account.subtract(2.99);
    assert_eq!(account.balance(), 9, "2.99 should be debited as 2");
    account.set_balance(42.9);
    assert_eq!(account.balance(), 42, "set_balance should truncate");
}

#[test]
fn balance_may_go_negative() {
    let mut account = Account::new(3);
    account.subtract(5.0);
    assert_eq!(account.balance(), -2, "Account must not refuse a debit");
}

#[test]
fn clones_do_not_share_state() {
    let original = Account::new(50);
    let mut copy = original.clone();
    copy.subtract(50.0);
    assert_eq!(original.balance(), 50);
    assert_eq!(copy.balance(), 0);
}
