//! Property-Based Test Generators
//!
//! Provides proptest strategies for credential records and cache keys.

use core_kernel::CrmUserId;
use domain_session::{CrmUser, SecurityToken};
use proptest::option;
use proptest::prelude::*;

/// Strategy for generating caller identities
pub fn crm_user_id_strategy() -> impl Strategy<Value = CrmUserId> {
    "[a-z][a-z0-9-]{0,15}".prop_map(CrmUserId::new)
}

/// Strategy for generating tokens of either shape
pub fn security_token_strategy() -> impl Strategy<Value = SecurityToken> {
    prop_oneof![
        "[A-Z0-9]{8,24}".prop_map(SecurityToken::Session),
        prop::collection::vec("[A-Za-z0-9]{4,12}", 1..4).prop_map(SecurityToken::Composite),
    ]
}

/// Strategy for generating credential records keyed by `id`
pub fn crm_user_strategy(id: CrmUserId) -> impl Strategy<Value = CrmUser> {
    (
        option::of("[a-z]{1,8}@example\\.com"),
        option::of("[a-zA-Z0-9]{1,12}"),
        option::of("[a-z]{1,10}\\.example\\.com"),
        option::of(prop_oneof![Just("http".to_string()), Just("https".to_string())]),
        option::of(prop_oneof![Just("ZH".to_string()), Just("MS".to_string())]),
        option::of(security_token_strategy()),
    )
        .prop_map(move |(user, password, url, protocol, crm_type, token)| CrmUser {
            id: id.clone(),
            crm_user_id: user,
            crm_password: password,
            crm_service_url: url,
            crm_service_protocol: protocol,
            crm_type,
            token,
            ext_trans_id: None,
        })
}

/// Strategy for generating an identity together with a record for it
pub fn keyed_user_strategy() -> impl Strategy<Value = (CrmUserId, CrmUser)> {
    crm_user_id_strategy().prop_flat_map(|id| (Just(id.clone()), crm_user_strategy(id)))
}
