//! # End-to-end Land Registry Flows
//!
//! Drives a fully wired `Atlas` through issuance, rate and flag management,
//! enumeration, burning, authority swaps, rollback and proxy upgrades.

use std::sync::Arc;

use atlas_authority::{AuthorityError, SignatureAuthority, WhitelistAuthority};
use atlas_core::{
    Address, AtlasConfig, Axis, ClassTag, CodecError, Coordinate, CoordinateCodec, GlobalId,
    LandFlags, ProductionRates, ResourceKind, Selector,
};
use atlas_registry::land::{
    ASSIGN_NEW_LAND_SIGNATURE, SET_RESOURCE_RATES_SIGNATURE, SET_RESOURCE_RATE_SIGNATURE,
};
use atlas_registry::{
    Atlas, Implementation, LandBaseV1, LandEnv, LandLogic, ModuleKind, RegistryError,
    ResourceTokens,
};

fn addr(label: &str) -> Address {
    Address::derive(label)
}

struct Fixture {
    atlas: Atlas,
    operator: Address,
    minter: Address,
    alice: Address,
    tokens: ResourceTokens,
    land_authority: Address,
}

/// x in [-100, 100], y in [-30, 30]; `minter` whitelisted on the land module.
fn fixture() -> Fixture {
    let operator = addr("operator");
    let minter = addr("minter");
    let tokens = ResourceTokens::derived("test");
    let config = AtlasConfig {
        x_bound: 100,
        y_bound: 30,
        ..AtlasConfig::default()
    };
    let mut atlas = Atlas::deploy(config, operator, tokens).unwrap();
    let land = atlas.deployment().land;
    let land_authority = atlas
        .install_authority(Box::new(WhitelistAuthority::with_callers(
            addr("land-authority"),
            operator,
            land,
            [minter],
        )))
        .unwrap();
    atlas
        .set_authority(&operator, ModuleKind::Land, Some(land_authority))
        .unwrap();
    Fixture {
        atlas,
        operator,
        minter,
        alice: addr("alice"),
        tokens,
        land_authority,
    }
}

#[test]
fn deploy_records_every_module_in_settings() {
    let f = fixture();
    let d = *f.atlas.deployment();
    assert_eq!(f.atlas.module_address("CONTRACT_LAND_BASE").unwrap(), d.land);
    assert_eq!(f.atlas.module_address("CONTRACT_OBJECT_OWNERSHIP").unwrap(), d.ownership);
    assert_eq!(f.atlas.module_address("CONTRACT_TOKEN_LOCATION").unwrap(), d.location);
    assert_eq!(f.atlas.module_address("CONTRACT_GOLD_ERC20_TOKEN").unwrap(), f.tokens.gold);
    assert!(matches!(
        f.atlas.module_address("CONTRACT_UNKNOWN"),
        Err(RegistryError::SettingNotFound(_))
    ));
    assert_eq!(f.atlas.land().version(), 1);
    assert_eq!(f.atlas.ownership().version(), 1);
    assert_eq!(f.atlas.authority_of(ModuleKind::Ownership), Some(d.ownership_authority));
    assert_eq!(f.atlas.owner_of_module(ModuleKind::Land), f.operator);
}

#[test]
fn issue_parcel_with_rates() {
    let mut f = fixture();
    let rates = ProductionRates::new(100, 99, 98, 97, 96);
    let id = f
        .atlas
        .assign_new_land_with_rates(&f.minter, -90, 12, f.alice, rates)
        .unwrap();

    assert_eq!(f.atlas.owner_of(id).unwrap(), f.alice);
    assert_eq!(f.atlas.balance_of(&f.alice), 1);
    assert_eq!(f.atlas.resource_rates(id).unwrap().as_array(), [100, 99, 98, 97, 96]);
    assert_eq!(f.atlas.resource_rate(id, &f.tokens.fire).unwrap(), 97);
    assert_eq!(f.atlas.location_of(id).map(|c| (c.x, c.y)), Some((-90, 12)));
    assert_eq!(f.atlas.token_id_by_location(-90, 12).unwrap(), id);
    assert!(f.atlas.land_exists(-90, 12).unwrap());

    let (module, local) = f.atlas.decode(id).unwrap();
    assert_eq!(module, f.atlas.deployment().land);
    let codec = CoordinateCodec::new(100, 30).unwrap();
    assert_eq!(local, codec.encode(-90, 12).unwrap());
}

#[test]
fn second_assignment_of_same_parcel_rejected() {
    let mut f = fixture();
    let rates = ProductionRates::new(100, 99, 98, 97, 96);
    let id = f
        .atlas
        .assign_new_land_with_rates(&f.minter, -90, 12, f.alice, rates)
        .unwrap();

    let bob = addr("bob");
    let err = f
        .atlas
        .assign_new_land_with_rates(&f.minter, -90, 12, bob, ProductionRates::default())
        .unwrap_err();
    assert_eq!(err, RegistryError::AlreadyAssigned(id));
    assert_eq!(f.atlas.owner_of(id).unwrap(), f.alice);
    assert_eq!(f.atlas.resource_rates(id).unwrap(), rates);
    assert_eq!(f.atlas.balance_of(&bob), 0);
}

#[test]
fn coordinates_checked_per_axis() {
    let mut f = fixture();
    let err = f
        .atlas
        .assign_new_land(&f.minter, -99, 32, f.alice)
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::Codec(CodecError::OutOfRange {
            axis: Axis::Y,
            value: 32,
            bound: 30,
        })
    );
    assert_eq!(f.atlas.balance_of(&f.alice), 0);

    let id = f.atlas.assign_new_land(&f.minter, -99, 12, f.alice).unwrap();
    assert_eq!(f.atlas.resource_rates(id).unwrap(), ProductionRates::default());
    assert!(f.atlas.assign_new_land(&f.minter, 101, 0, f.alice).is_err());
}

#[test]
fn rate_outside_width_rejected_before_any_write() {
    let mut f = fixture();
    let err = f
        .atlas
        .assign_new_land_with_rates(&f.minter, 0, 0, f.alice, ProductionRates::new(0, 65536, 0, 0, 0))
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Codec(CodecError::RateOutOfRange { kind: ResourceKind::Wood, .. })
    ));
    assert!(!f.atlas.land_exists(0, 0).unwrap());
}

#[test]
fn stranger_cannot_issue() {
    let mut f = fixture();
    let err = f
        .atlas
        .assign_new_land(&addr("stranger"), 1, 1, f.alice)
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert!(!f.atlas.land_exists(1, 1).unwrap());
    assert_eq!(f.atlas.balance_of(&f.alice), 0);
}

#[test]
fn swapping_land_authority_revokes_old_grants() {
    let mut f = fixture();
    f.atlas.assign_new_land(&f.minter, 1, 1, f.alice).unwrap();

    let empty = f
        .atlas
        .install_authority(Box::new(WhitelistAuthority::new(addr("empty"), f.operator)))
        .unwrap();
    f.atlas
        .set_authority(&f.operator, ModuleKind::Land, Some(empty))
        .unwrap();

    let err = f.atlas.assign_new_land(&f.minter, 2, 2, f.alice).unwrap_err();
    assert!(err.is_unauthorized());
    // The owner still passes regardless of the authority.
    f.atlas.assign_new_land(&f.operator, 2, 2, f.alice).unwrap();
}

#[test]
fn only_module_owner_swaps_authority() {
    let mut f = fixture();
    let err = f
        .atlas
        .set_authority(&f.minter, ModuleKind::Land, None)
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(f.atlas.authority_of(ModuleKind::Land), Some(f.land_authority));

    let err = f
        .atlas
        .set_authority(&f.operator, ModuleKind::Land, Some(addr("nowhere")))
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::Authority(AuthorityError::UnknownAuthority(addr("nowhere")))
    );
}

#[test]
fn failed_location_write_rolls_back_mint() {
    let mut f = fixture();
    let d = *f.atlas.deployment();
    f.atlas
        .authority_mut::<WhitelistAuthority>(&d.location_authority)
        .unwrap()
        .set_whitelist(&f.operator, d.location, d.land, false)
        .unwrap();

    let err = f.atlas.assign_new_land(&f.minter, 5, 5, f.alice).unwrap_err();
    assert!(err.is_unauthorized());
    let id = f.atlas.encode_token_id(5, 5).unwrap();
    assert!(!f.atlas.exists(id));
    assert_eq!(f.atlas.balance_of(&f.alice), 0);
    assert!(f.atlas.location_of(id).is_none());
    assert!(matches!(
        f.atlas.land_attribute(id),
        Err(RegistryError::NonexistentToken(_))
    ));
}

#[test]
fn set_single_rate_by_token_address() {
    let mut f = fixture();
    let id = f
        .atlas
        .assign_new_land_with_rates(&f.minter, 3, -4, f.alice, ProductionRates::new(1, 2, 3, 4, 5))
        .unwrap();

    f.atlas
        .set_resource_rate(&f.minter, id, f.tokens.wood, 7)
        .unwrap();
    assert_eq!(f.atlas.resource_rates(id).unwrap().as_array(), [1, 7, 3, 4, 5]);
    assert_eq!(f.atlas.resource_rate(id, &f.tokens.wood).unwrap(), 7);

    let err = f
        .atlas
        .set_resource_rate(&f.minter, id, addr("not-a-token"), 7)
        .unwrap_err();
    assert_eq!(err, RegistryError::UnknownResource(addr("not-a-token")));

    f.atlas
        .set_resource_rates(&f.minter, id, ProductionRates::new(9, 9, 9, 9, 9))
        .unwrap();
    assert_eq!(f.atlas.resource_rates(id).unwrap(), ProductionRates::new(9, 9, 9, 9, 9));

    let missing = f.atlas.encode_token_id(0, 0).unwrap();
    assert_eq!(
        f.atlas
            .set_resource_rates(&f.minter, missing, ProductionRates::default())
            .unwrap_err(),
        RegistryError::NonexistentToken(missing)
    );
}

#[test]
fn transfer_and_burn() {
    let mut f = fixture();
    let bob = addr("bob");
    let id = f.atlas.assign_new_land(&f.minter, 0, 0, f.alice).unwrap();

    assert!(matches!(
        f.atlas.transfer(&bob, bob, id),
        Err(RegistryError::NotHolder { .. })
    ));
    f.atlas.transfer(&f.alice, bob, id).unwrap();
    assert_eq!(f.atlas.owner_of(id).unwrap(), bob);
    assert_eq!(f.atlas.balance_of(&f.alice), 0);

    // Only land is trusted on the ownership ledger; the owner bypasses.
    assert!(f.atlas.burn_object(&f.minter, bob, id).unwrap_err().is_unauthorized());
    f.atlas.burn_object(&f.operator, bob, id).unwrap();
    assert!(!f.atlas.exists(id));
    assert_eq!(f.atlas.balance_of(&bob), 0);
}

#[test]
fn burned_parcel_is_never_reissued() {
    let mut f = fixture();
    let bob = addr("bob");
    let rates = ProductionRates::new(100, 99, 98, 97, 96);
    let id = f
        .atlas
        .assign_new_land_with_rates(&f.minter, -90, 12, f.alice, rates)
        .unwrap();
    f.atlas.burn_object(&f.operator, f.alice, id).unwrap();

    assert_eq!(
        f.atlas
            .assign_new_land_with_rates(&f.minter, -90, 12, bob, ProductionRates::default())
            .unwrap_err(),
        RegistryError::AlreadyAssigned(id)
    );
    assert_eq!(
        f.atlas.mint_object(&f.operator, bob, id).unwrap_err(),
        RegistryError::AlreadyAssigned(id)
    );
    assert_eq!(f.atlas.balance_of(&bob), 0);
    assert!(!f.atlas.land_exists(-90, 12).unwrap());
    assert_eq!(f.atlas.total_supply(), 0);

    // Burned parcels answer no attribute queries and accept no writes.
    assert_eq!(f.atlas.resource_rates(id), Err(RegistryError::NonexistentToken(id)));
    assert_eq!(
        f.atlas.resource_rate(id, &f.tokens.gold),
        Err(RegistryError::NonexistentToken(id))
    );
    assert_eq!(f.atlas.land_attribute(id), Err(RegistryError::NonexistentToken(id)));
    assert_eq!(f.atlas.flags(id), Err(RegistryError::NonexistentToken(id)));
    assert!(f.atlas.location_of(id).is_none());
    assert_eq!(
        f.atlas
            .set_resource_rate(&f.minter, id, f.tokens.gold, 1)
            .unwrap_err(),
        RegistryError::NonexistentToken(id)
    );
    assert_eq!(
        f.atlas
            .set_flags(&f.minter, id, LandFlags::RESERVED)
            .unwrap_err(),
        RegistryError::NonexistentToken(id)
    );
}

#[test]
fn failed_issue_after_many_parcels_keeps_every_parcel() {
    let mut f = fixture();
    let mut issued = Vec::new();
    for x in -25..25 {
        issued.push(f.atlas.assign_new_land(&f.minter, x, 7, f.alice).unwrap());
    }
    f.atlas
        .set_resource_rates(&f.minter, issued[3], ProductionRates::new(5, 4, 3, 2, 1))
        .unwrap();

    let d = *f.atlas.deployment();
    f.atlas
        .authority_mut::<WhitelistAuthority>(&d.location_authority)
        .unwrap()
        .set_whitelist(&f.operator, d.location, d.land, false)
        .unwrap();
    assert!(f
        .atlas
        .assign_new_land(&f.minter, 0, 0, f.alice)
        .unwrap_err()
        .is_unauthorized());

    assert_eq!(f.atlas.total_supply(), 50);
    assert_eq!(f.atlas.balance_of(&f.alice), 50);
    for (index, id) in issued.iter().enumerate() {
        assert_eq!(f.atlas.token_by_index(index as u64).unwrap(), *id);
        assert!(f.atlas.location_of(*id).is_some());
    }
    assert_eq!(
        f.atlas.resource_rates(issued[3]).unwrap(),
        ProductionRates::new(5, 4, 3, 2, 1)
    );
    assert!(!f.atlas.land_exists(0, 0).unwrap());

    f.atlas
        .authority_mut::<WhitelistAuthority>(&d.location_authority)
        .unwrap()
        .set_whitelist(&f.operator, d.location, d.land, true)
        .unwrap();
    let late = f.atlas.assign_new_land(&f.minter, 0, 0, f.alice).unwrap();
    assert_eq!(f.atlas.token_by_index(50).unwrap(), late);
}

#[test]
fn flags_are_gated_like_rate_setters() {
    let mut f = fixture();
    let id = f.atlas.assign_new_land(&f.minter, 4, 4, f.alice).unwrap();
    assert_eq!(f.atlas.flags(id).unwrap(), LandFlags::empty());

    assert!(f
        .atlas
        .set_flags(&addr("stranger"), id, LandFlags::SPECIAL)
        .unwrap_err()
        .is_unauthorized());
    f.atlas
        .set_flags(&f.minter, id, LandFlags::RESERVED | LandFlags::HAS_BOX)
        .unwrap();
    let flags = f.atlas.flags(id).unwrap();
    assert!(flags.contains(LandFlags::RESERVED));
    assert!(flags.contains(LandFlags::HAS_BOX));
    assert!(!flags.contains(LandFlags::SPECIAL));

    // Flags live beside the rates without disturbing them.
    f.atlas
        .set_resource_rate(&f.minter, id, f.tokens.soil, 12)
        .unwrap();
    assert_eq!(f.atlas.flags(id).unwrap(), flags);
    assert_eq!(f.atlas.resource_rate(id, &f.tokens.soil).unwrap(), 12);

    let missing = f.atlas.encode_token_id(9, 9).unwrap();
    assert_eq!(
        f.atlas
            .set_flags(&f.minter, missing, LandFlags::SPECIAL)
            .unwrap_err(),
        RegistryError::NonexistentToken(missing)
    );
}

#[test]
fn auction_listing_skips_reserved_and_special_parcels() {
    let mut f = fixture();
    let coordinates = [(-3, 1), (0, 0), (2, -5), (7, 7), (10, -10)];
    let mut ids = Vec::new();
    for (x, y) in coordinates {
        ids.push(f.atlas.assign_new_land(&f.minter, x, y, f.operator).unwrap());
    }
    f.atlas.set_flags(&f.minter, ids[1], LandFlags::RESERVED).unwrap();
    f.atlas.set_flags(&f.minter, ids[3], LandFlags::SPECIAL).unwrap();
    f.atlas.set_flags(&f.minter, ids[4], LandFlags::HAS_BOX).unwrap();

    let listed: Vec<Coordinate> = (0..f.atlas.total_supply())
        .map(|index| f.atlas.token_by_index(index).unwrap())
        .filter(|id| !f.atlas.flags(*id).unwrap().is_withheld())
        .map(|id| f.atlas.decode_token_id(id).unwrap())
        .collect();
    assert_eq!(
        listed,
        vec![Coordinate::new(-3, 1), Coordinate::new(2, -5), Coordinate::new(10, -10)]
    );
    assert_eq!(
        f.atlas.token_by_index(5),
        Err(RegistryError::IndexOutOfBounds { index: 5, supply: 5 })
    );
}

#[test]
fn decode_token_id_rejects_non_land_identifiers() {
    let mut f = fixture();
    let ownership = f.atlas.deployment().ownership;
    let ledger_id = f.atlas.encoder().encode_for_module(&ownership, 1).unwrap();
    assert!(matches!(
        f.atlas.decode_token_id(ledger_id),
        Err(RegistryError::ClassMismatch { .. })
    ));
    let id = f.atlas.assign_new_land(&f.minter, -100, 30, f.alice).unwrap();
    assert_eq!(f.atlas.decode_token_id(id).unwrap(), Coordinate::new(-100, 30));
}

#[test]
fn signature_authority_admits_only_listed_selector() {
    let mut f = fixture();
    let id = f.atlas.assign_new_land(&f.minter, 6, 6, f.alice).unwrap();

    let land = f.atlas.deployment().land;
    let rate_setter = addr("rate-setter");
    let authority = f
        .atlas
        .install_authority(Box::new(SignatureAuthority::for_selectors(
            addr("rate-setter-authority"),
            f.operator,
            land,
            &[rate_setter],
            &[Selector::of(SET_RESOURCE_RATES_SIGNATURE)],
        )))
        .unwrap();
    f.atlas
        .set_authority(&f.operator, ModuleKind::Land, Some(authority))
        .unwrap();
    assert!(f.atlas.can_call(
        &authority,
        &rate_setter,
        &land,
        Selector::of(SET_RESOURCE_RATES_SIGNATURE)
    ));
    assert!(!f.atlas.can_call(
        &authority,
        &rate_setter,
        &land,
        Selector::of(ASSIGN_NEW_LAND_SIGNATURE)
    ));

    f.atlas
        .set_resource_rates(&rate_setter, id, ProductionRates::new(8, 8, 8, 8, 8))
        .unwrap();
    assert_eq!(f.atlas.resource_rates(id).unwrap(), ProductionRates::new(8, 8, 8, 8, 8));

    let err = f
        .atlas
        .set_resource_rate(&rate_setter, id, f.tokens.gold, 1)
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::Authority(AuthorityError::Unauthorized {
            caller: rate_setter,
            target: land,
            selector: Selector::of(SET_RESOURCE_RATE_SIGNATURE),
        })
    );
    assert!(f
        .atlas
        .assign_new_land(&rate_setter, 7, 7, f.alice)
        .unwrap_err()
        .is_unauthorized());
    // The whitelist that trusted the minter is no longer consulted.
    assert!(f
        .atlas
        .set_resource_rates(&f.minter, id, ProductionRates::default())
        .unwrap_err()
        .is_unauthorized());
    assert_eq!(f.atlas.resource_rate(id, &f.tokens.gold).unwrap(), 8);
}

#[test]
fn uint_settings_written_by_settings_owner() {
    let mut f = fixture();
    assert!(matches!(
        f.atlas.setting_uint("UINT_AUCTION_DURATION"),
        Err(RegistryError::SettingNotFound(_))
    ));
    f.atlas
        .set_setting_uint(&f.operator, "UINT_AUCTION_DURATION", 86_400)
        .unwrap();
    assert_eq!(f.atlas.setting_uint("UINT_AUCTION_DURATION").unwrap(), 86_400);

    assert!(f
        .atlas
        .set_setting_uint(&f.minter, "UINT_AUCTION_DURATION", 1)
        .unwrap_err()
        .is_unauthorized());
    assert_eq!(f.atlas.setting_uint("UINT_AUCTION_DURATION").unwrap(), 86_400);
}

#[test]
fn generic_module_shares_identifier_space() {
    let mut f = fixture();
    let items = addr("items");
    assert!(f
        .atlas
        .register_module(&f.minter, items, ClassTag(7))
        .unwrap_err()
        .is_unauthorized());
    let index = f.atlas.register_module(&f.operator, items, ClassTag(7)).unwrap();
    assert_eq!(index.0, 3);

    let id = f.atlas.encoder().encode_for_module(&items, 42).unwrap();
    f.atlas.mint_object(&f.operator, f.alice, id).unwrap();
    assert_eq!(f.atlas.decode(id).unwrap(), (items, 42));
    assert_eq!(f.atlas.owner_of(id).unwrap(), f.alice);

    let parcel = f.atlas.assign_new_land(&f.minter, 0, 0, f.alice).unwrap();
    assert_ne!(parcel, id);
    assert_eq!(f.atlas.balance_of(&f.alice), 2);

    let forged = GlobalId::from_u128(id.as_u128() ^ 1u128 << 100);
    assert_eq!(
        f.atlas.mint_object(&f.operator, f.alice, forged).unwrap_err(),
        RegistryError::UnknownIdentifier(forged)
    );
}

/// Issues like the first implementation but refuses bulk rate changes.
struct FrozenRates;

impl Implementation for FrozenRates {
    fn implementation_name(&self) -> &str {
        "FrozenRates"
    }
}

impl LandLogic for FrozenRates {
    fn assign_new_land(
        &self,
        env: &mut LandEnv<'_>,
        caller: &Address,
        x: i32,
        y: i32,
        to: Address,
        rates: ProductionRates,
    ) -> Result<GlobalId, RegistryError> {
        LandBaseV1.assign_new_land(env, caller, x, y, to, rates)
    }

    fn set_resource_rates(
        &self,
        _env: &mut LandEnv<'_>,
        caller: &Address,
        _id: GlobalId,
        _rates: ProductionRates,
    ) -> Result<(), RegistryError> {
        Err(AuthorityError::Unauthorized {
            caller: *caller,
            target: Address::ZERO,
            selector: Selector::of("frozen()"),
        }
        .into())
    }

    fn set_resource_rate(
        &self,
        env: &mut LandEnv<'_>,
        caller: &Address,
        id: GlobalId,
        resource: Address,
        rate: u32,
    ) -> Result<(), RegistryError> {
        LandBaseV1.set_resource_rate(env, caller, id, resource, rate)
    }

    fn set_flags(
        &self,
        env: &mut LandEnv<'_>,
        caller: &Address,
        id: GlobalId,
        flags: LandFlags,
    ) -> Result<(), RegistryError> {
        LandBaseV1.set_flags(env, caller, id, flags)
    }
}

#[test]
fn upgrade_keeps_parcels() {
    let mut f = fixture();
    let rates = ProductionRates::new(100, 99, 98, 97, 96);
    let id = f
        .atlas
        .assign_new_land_with_rates(&f.minter, -90, 12, f.alice, rates)
        .unwrap();

    assert!(f
        .atlas
        .upgrade_land(&f.minter, Arc::new(FrozenRates))
        .unwrap_err()
        .is_unauthorized());
    f.atlas.upgrade_land(&f.operator, Arc::new(FrozenRates)).unwrap();
    assert_eq!(f.atlas.land().version(), 2);

    assert_eq!(f.atlas.resource_rates(id).unwrap(), rates);
    assert_eq!(f.atlas.owner_of(id).unwrap(), f.alice);
    assert!(f
        .atlas
        .set_resource_rates(&f.minter, id, ProductionRates::default())
        .is_err());
    f.atlas
        .set_resource_rate(&f.minter, id, f.tokens.gold, 1)
        .unwrap();
    assert_eq!(f.atlas.resource_rate(id, &f.tokens.gold).unwrap(), 1);

    let next = f.atlas.assign_new_land(&f.minter, -89, 12, f.alice).unwrap();
    assert_eq!(f.atlas.balance_of(&f.alice), 2);
    assert_ne!(next, id);
}

#[test]
fn ownership_handover() {
    let mut f = fixture();
    let heir = addr("heir");
    assert!(f
        .atlas
        .set_owner(&f.minter, ModuleKind::Land, heir)
        .unwrap_err()
        .is_unauthorized());
    f.atlas.set_owner(&f.operator, ModuleKind::Land, heir).unwrap();
    assert_eq!(f.atlas.owner_of_module(ModuleKind::Land), heir);
    assert!(f
        .atlas
        .set_authority(&f.operator, ModuleKind::Land, None)
        .unwrap_err()
        .is_unauthorized());
    f.atlas.set_authority(&heir, ModuleKind::Land, None).unwrap();
    assert!(f.atlas.assign_new_land(&f.minter, 0, 0, heir).is_err());
}
