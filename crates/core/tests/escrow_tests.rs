use cosmwasm_std::{coins, Uint128};
use relay_fee_core::{Bank, FeeError, FeeKeeper, MockBank, MockChannelSource};
use relay_fee_types::{Fee, PacketFee, PacketId};

const ESCROW: &str = "fee-escrow";
const REFUND: &str = "refund-acc";

fn default_fee() -> Fee {
    Fee::new(coins(200, "stake"), coins(200, "stake"), coins(200, "stake"))
}

fn setup() -> (FeeKeeper<MockBank, MockChannelSource>, PacketId) {
    let bank = MockBank::new();
    bank.add_account(ESCROW);
    bank.fund(REFUND, &coins(1000, "stake"));

    let channels = MockChannelSource::new();
    channels.set_next_sequence("transfer", "channel-0", 1);

    let mut keeper = FeeKeeper::new(bank, channels, ESCROW);
    keeper.set_fee_enabled("transfer", "channel-0");

    (keeper, PacketId::new("transfer", "channel-0", 1))
}

#[test]
fn test_escrow_success() {
    let (mut keeper, packet_id) = setup();
    let packet_fee = PacketFee::new(default_fee(), REFUND, vec![]);

    keeper
        .escrow_packet_fee(&packet_id, packet_fee.clone())
        .unwrap();

    let record = keeper.get_fees_in_escrow(&packet_id).unwrap();
    assert_eq!(record.packet_fees, vec![packet_fee]);
    assert_eq!(keeper.bank().balance(ESCROW, "stake"), Uint128::new(600));
    assert_eq!(keeper.bank().balance(REFUND, "stake"), Uint128::new(400));
}

#[test]
fn test_escrow_appends_to_existing_record() {
    let (mut keeper, packet_id) = setup();
    let packet_fee = PacketFee::new(default_fee(), REFUND, vec![]);

    keeper
        .escrow_packet_fee(&packet_id, packet_fee.clone())
        .unwrap();
    // a second payer (or the same one) escrows again for the same packet
    keeper.escrow_packet_fee(&packet_id, packet_fee).unwrap();

    let record = keeper.get_fees_in_escrow(&packet_id).unwrap();
    assert_eq!(record.len(), 2);
    assert_eq!(keeper.bank().balance(ESCROW, "stake"), Uint128::new(1200));
}

#[test]
fn test_escrow_fee_not_enabled() {
    let (mut keeper, _) = setup();
    let disabled = PacketId::new("transfer", "disabled-channel", 1);
    let packet_fee = PacketFee::new(default_fee(), REFUND, vec![]);

    let err = keeper.escrow_packet_fee(&disabled, packet_fee).unwrap_err();
    assert!(matches!(err, FeeError::FeeNotEnabled { .. }));
    assert!(keeper.get_fees_in_escrow(&disabled).is_none());
}

#[test]
fn test_escrow_refund_account_missing() {
    let (mut keeper, packet_id) = setup();
    let packet_fee = PacketFee::new(default_fee(), "ghost-acc", vec![]);

    let err = keeper.escrow_packet_fee(&packet_id, packet_fee).unwrap_err();
    assert_eq!(
        err,
        FeeError::AccountNotFound {
            address: "ghost-acc".to_string()
        }
    );
}

#[test]
fn test_escrow_insufficient_funds_leaves_no_record() {
    let (mut keeper, packet_id) = setup();
    let fee = Fee::new(
        coins(600, "stake"),
        coins(600, "stake"),
        coins(600, "stake"),
    );
    let packet_fee = PacketFee::new(fee, REFUND, vec![]);

    let err = keeper.escrow_packet_fee(&packet_id, packet_fee).unwrap_err();
    assert!(matches!(err, FeeError::InsufficientFunds { .. }));

    // transfer and append are atomic: neither happened
    assert!(keeper.get_fees_in_escrow(&packet_id).is_none());
    assert_eq!(keeper.bank().balance(REFUND, "stake"), Uint128::new(1000));
    assert_eq!(keeper.bank().balance(ESCROW, "stake"), Uint128::zero());
}

#[test]
fn test_escrow_insufficient_in_one_denom() {
    let (mut keeper, packet_id) = setup();
    // refund account holds no uosmo at all
    let fee = Fee::new(coins(100, "stake"), coins(100, "stake"), coins(1, "uosmo"));
    let packet_fee = PacketFee::new(fee, REFUND, vec![]);

    let err = keeper.escrow_packet_fee(&packet_id, packet_fee).unwrap_err();
    assert_eq!(
        err,
        FeeError::InsufficientFunds {
            address: REFUND.to_string(),
            denom: "uosmo".to_string()
        }
    );
}

#[test]
fn test_pay_packet_fee_uses_next_sequence() {
    let (mut keeper, _) = setup();

    let packet_id = keeper
        .pay_packet_fee(default_fee(), "transfer", "channel-0", REFUND, vec![])
        .unwrap();

    assert_eq!(packet_id, PacketId::new("transfer", "channel-0", 1));
    assert!(keeper.has_fees_in_escrow(&packet_id));
}

#[test]
fn test_pay_packet_fee_unknown_channel() {
    let (mut keeper, _) = setup();

    let err = keeper
        .pay_packet_fee(default_fee(), "transfer", "channel-9", REFUND, vec![])
        .unwrap_err();
    assert!(matches!(err, FeeError::ChannelNotFound { .. }));
}

#[test]
fn test_pay_packet_fee_async_requires_in_flight_packet() {
    let (mut keeper, packet_id) = setup();
    let packet_fee = PacketFee::new(default_fee(), REFUND, vec![]);

    // packet never sent: not in flight
    let err = keeper
        .pay_packet_fee_async(&packet_id, packet_fee.clone())
        .unwrap_err();
    assert_eq!(err, FeeError::PacketNotFound(packet_id.clone()));

    // once in flight, the async top-up succeeds
    let channels = MockChannelSource::new();
    channels.set_next_sequence("transfer", "channel-0", 1);
    channels.mark_in_flight(packet_id.clone());
    let bank = MockBank::new();
    bank.add_account(ESCROW);
    bank.fund(REFUND, &coins(1000, "stake"));
    let mut keeper = FeeKeeper::new(bank, channels, ESCROW);
    keeper.set_fee_enabled("transfer", "channel-0");

    keeper.pay_packet_fee_async(&packet_id, packet_fee).unwrap();
    assert!(keeper.has_fees_in_escrow(&packet_id));
}

#[test]
fn test_register_counterparty_address_is_unvalidated() {
    let (mut keeper, _) = setup();

    // stored opaque: even a malformed string is accepted and overwritten
    keeper.register_counterparty_address("local-acc", "not a real address", "channel-0");
    keeper.register_counterparty_address("local-acc", "osmo1counterparty", "channel-0");

    assert_eq!(
        keeper.counterparty_address("local-acc", "channel-0"),
        Some("osmo1counterparty".to_string())
    );
}
