use kittens_bot::policy::{HeuristicPolicy, Policy, PolicyContext, RandomPolicy};
use kittens_core::game::serialization::SnapshotRecord;
use kittens_core::game::snapshot::{GameSnapshot, PlayedCard};
use kittens_core::model::card::{Card, CardKind};
use kittens_core::model::hand::Hand;
use kittens_core::model::seat::SeatId;

fn seat() -> SeatId {
    SeatId::from_index(0).unwrap()
}

fn card(id: u16, kind: CardKind) -> Card {
    Card::new(id, kind)
}

fn snapshot(cards: usize, alive: usize, history: &[PlayedCard]) -> GameSnapshot<'_> {
    GameSnapshot::new(seat(), cards, alive, history)
}

/// Every combination of up to two cards of each playable kind, plus a defuse.
fn hands() -> Vec<Hand> {
    let mut hands = Vec::new();
    for normals in 0..3u16 {
        for skips in 0..3u16 {
            for peeks in 0..3u16 {
                for defuse in [false, true] {
                    let mut cards = Vec::new();
                    let mut id = 0u16;
                    for (count, kind) in [
                        (normals, CardKind::Normal),
                        (skips, CardKind::Skip),
                        (peeks, CardKind::SeeTheFuture),
                    ] {
                        for _ in 0..count {
                            cards.push(card(id, kind));
                            id += 1;
                        }
                    }
                    if defuse {
                        cards.push(card(id, CardKind::Defuse));
                    }
                    hands.push(Hand::with_cards(cards));
                }
            }
        }
    }
    hands
}

#[test]
fn any_peek_card_is_played_first() {
    for (seed, hand) in hands().iter().enumerate() {
        if !hand.has(CardKind::SeeTheFuture) {
            continue;
        }
        for (cards, alive) in [(30, 2), (3, 5), (1, 4)] {
            let mut policy = HeuristicPolicy::from_seed(seed as u64);
            let ctx = PolicyContext::new(hand, snapshot(cards, alive, &[]));
            let chosen = policy.play_turn(&ctx).expect("peek card expected");
            assert_eq!(chosen.kind, CardKind::SeeTheFuture);
        }
    }
}

#[test]
fn risky_draw_is_skipped() {
    // 4 opponents' kittens over 6 cards puts the next draw well above "unsure".
    for (seed, hand) in hands().iter().enumerate() {
        if hand.has(CardKind::SeeTheFuture) || !hand.has(CardKind::Skip) {
            continue;
        }
        let mut policy = HeuristicPolicy::from_seed(seed as u64);
        let ctx = PolicyContext::new(hand, snapshot(6, 5, &[]));
        let chosen = policy.play_turn(&ctx).expect("skip expected");
        assert_eq!(chosen.kind, CardKind::Skip);
    }
}

#[test]
fn safe_draw_keeps_skips_in_hand() {
    let skip = card(1, CardKind::Skip);
    let normal = card(2, CardKind::Normal);
    let hand = Hand::with_cards(vec![skip, normal]);
    let mut policy = HeuristicPolicy::from_seed(8);
    let ctx = PolicyContext::new(&hand, snapshot(40, 3, &[]));
    assert_eq!(policy.play_turn(&ctx), Some(normal));
}

#[test]
fn normals_only_hand_plays_one_of_them() {
    let hand = Hand::with_cards(vec![
        card(1, CardKind::Normal),
        card(2, CardKind::Normal),
        card(3, CardKind::Normal),
    ]);
    let mut seen = Vec::new();
    for seed in 0..32 {
        let mut policy = HeuristicPolicy::from_seed(seed);
        let ctx = PolicyContext::new(&hand, snapshot(12, 3, &[]));
        let chosen = policy.play_turn(&ctx).expect("normal expected");
        assert!(hand.contains(chosen));
        if !seen.contains(&chosen) {
            seen.push(chosen);
        }
    }
    assert!(seen.len() > 1, "selection should vary with the seed");
}

#[test]
fn nothing_playable_means_draw() {
    let empty = Hand::new();
    let defuse_only = Hand::with_cards(vec![card(1, CardKind::Defuse)]);
    for hand in [&empty, &defuse_only] {
        let mut policy = HeuristicPolicy::from_seed(0);
        for (cards, alive) in [(20, 4), (2, 5), (0, 2)] {
            let ctx = PolicyContext::new(hand, snapshot(cards, alive, &[]));
            assert_eq!(policy.play_turn(&ctx), None);
        }
    }

    // Holding only skips with a safe-looking pile also draws.
    let skips = Hand::with_cards(vec![card(1, CardKind::Skip)]);
    let mut policy = HeuristicPolicy::from_seed(0);
    assert_eq!(
        policy.play_turn(&PolicyContext::new(&skips, snapshot(20, 4, &[]))),
        None
    );
}

#[test]
fn imminent_kitten_is_skipped_after_peek() {
    let skip = card(7, CardKind::Skip);
    let hand = Hand::with_cards(vec![card(1, CardKind::Normal), skip]);
    let mut policy = HeuristicPolicy::from_seed(1);
    let ctx = PolicyContext::new(&hand, snapshot(20, 4, &[]));
    let top = [
        card(50, CardKind::ExplodingKitten),
        card(51, CardKind::Normal),
        card(52, CardKind::Normal),
    ];
    assert_eq!(policy.react_to_peek(&ctx, &top), Some(skip));
}

#[test]
fn later_kitten_elevates_the_next_decision() {
    let skip = card(7, CardKind::Skip);
    let normal = card(1, CardKind::Normal);
    let hand = Hand::with_cards(vec![normal, skip]);
    let top = [
        card(50, CardKind::Normal),
        card(51, CardKind::ExplodingKitten),
        card(52, CardKind::Normal),
    ];

    // Without the peek the pile looks safe and a normal card goes out.
    let mut fresh = HeuristicPolicy::from_seed(2);
    let ctx = PolicyContext::new(&hand, snapshot(20, 4, &[]));
    assert_eq!(fresh.play_turn(&ctx), Some(normal));

    let mut policy = HeuristicPolicy::from_seed(2);
    assert_eq!(policy.react_to_peek(&ctx, &top), None);
    assert_eq!(policy.play_turn(&ctx), Some(skip));
}

#[test]
fn clean_peek_suppresses_skip() {
    let skip = card(7, CardKind::Skip);
    let hand = Hand::with_cards(vec![skip]);
    let ctx = PolicyContext::new(&hand, snapshot(4, 5, &[]));
    let top = [
        card(50, CardKind::Normal),
        card(51, CardKind::Normal),
        card(52, CardKind::Normal),
    ];

    let mut policy = HeuristicPolicy::from_seed(3);
    assert_eq!(policy.play_turn(&ctx), Some(skip));

    let mut peeked = HeuristicPolicy::from_seed(3);
    assert_eq!(peeked.react_to_peek(&ctx, &top), None);
    assert_eq!(peeked.play_turn(&ctx), None);
}

#[test]
fn kitten_defused_back_into_the_pile_voids_the_peek() {
    let skip = card(7, CardKind::Skip);
    let normal = card(8, CardKind::Normal);
    let hand = Hand::with_cards(vec![skip, card(9, CardKind::Skip), normal]);
    let top = [
        card(50, CardKind::ExplodingKitten),
        card(51, CardKind::Normal),
        card(52, CardKind::Normal),
    ];
    let mut policy = HeuristicPolicy::from_seed(5);
    let at_peek = PolicyContext::new(&hand, snapshot(13, 2, &[]));
    assert_eq!(policy.react_to_peek(&at_peek, &top), Some(skip));

    // The opponent drew that kitten, defused it and put it back: 13 cards again.
    let history = vec![PlayedCard::new(
        SeatId::from_index(1).unwrap(),
        card(60, CardKind::Defuse),
    )];
    let later = PolicyContext::new(&hand, snapshot(13, 2, &history));
    assert_eq!(policy.play_turn(&later), Some(normal));
}

#[test]
fn repeated_belief_updates_do_not_change_decisions() {
    let history = vec![
        PlayedCard::new(SeatId::from_index(1).unwrap(), card(90, CardKind::Defuse)),
        PlayedCard::new(SeatId::from_index(2).unwrap(), card(91, CardKind::Skip)),
    ];
    let hand = Hand::with_cards(vec![
        card(1, CardKind::Normal),
        card(2, CardKind::Normal),
        card(3, CardKind::Skip),
    ]);
    let ctx = PolicyContext::new(&hand, snapshot(18, 3, &history));

    let mut once = HeuristicPolicy::from_seed(21);
    once.update_beliefs(&ctx);
    let mut many = HeuristicPolicy::from_seed(21);
    for _ in 0..5 {
        many.update_beliefs(&ctx);
    }

    assert_eq!(once.history(), many.history());
    assert_eq!(once.play_turn(&ctx), many.play_turn(&ctx));
    assert_eq!(once.place_hazard(&ctx), many.place_hazard(&ctx));
}

#[test]
fn random_policy_shares_the_interface() {
    let hand = Hand::with_cards(vec![card(1, CardKind::Normal)]);
    let ctx = PolicyContext::new(&hand, snapshot(10, 3, &[]));
    let mut policies: Vec<Box<dyn Policy>> = vec![
        Box::new(HeuristicPolicy::from_seed(4)),
        Box::new(RandomPolicy::from_seed(4)),
    ];
    for policy in policies.iter_mut() {
        policy.update_beliefs(&ctx);
        assert_eq!(policy.play_turn(&ctx), Some(card(1, CardKind::Normal)));
        assert!(policy.place_hazard(&ctx) < 10);
    }
}

#[test]
fn captured_snapshot_replays_the_same_decision() {
    let history = vec![PlayedCard::new(
        SeatId::from_index(1).unwrap(),
        card(90, CardKind::Defuse),
    )];
    let hand = Hand::with_cards(vec![
        card(1, CardKind::Normal),
        card(2, CardKind::Normal),
        card(3, CardKind::Skip),
    ]);
    let live = snapshot(7, 4, &history).with_turn(12);
    let json = SnapshotRecord::to_json(&live).expect("serialize");
    let record = SnapshotRecord::from_json(&json).expect("deserialize");

    let mut original = HeuristicPolicy::from_seed(30);
    let mut replay = HeuristicPolicy::from_seed(30);
    let live_ctx = PolicyContext::new(&hand, live);
    let replay_ctx = PolicyContext::new(&hand, record.view());

    assert_eq!(replay_ctx.snapshot.turn(), 12);
    assert_eq!(original.play_turn(&live_ctx), replay.play_turn(&replay_ctx));
    assert_eq!(original.place_hazard(&live_ctx), replay.place_hazard(&replay_ctx));
}
