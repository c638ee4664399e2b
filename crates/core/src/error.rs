use relay_fee_types::PacketId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FeeError {
    #[error("fee module is locked")]
    ModuleLocked,

    #[error("fees are not enabled on port {port_id}, channel {channel_id}")]
    FeeNotEnabled { port_id: String, channel_id: String },

    #[error("account not found: {address}")]
    AccountNotFound { address: String },

    #[error("insufficient funds: {address} cannot cover {denom}")]
    InsufficientFunds { address: String, denom: String },

    #[error("invalid address: {address}")]
    AddressParseError { address: String },

    #[error("packet not found: {0}")]
    PacketNotFound(PacketId),

    #[error("channel not found: port {port_id}, channel {channel_id}")]
    ChannelNotFound { port_id: String, channel_id: String },
}
