// ═══════════════════════════════════════════════════════════════════════
// Test suite for the frisk engine
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::combat::{self, resolve_round};
    use crate::dice::{self, DiceQueue};
    use crate::engine::{apply_action, check_invariants, force_next_turn, pending, Action, ActionOutcome};
    use crate::error::{DiceError, EngineError};
    use crate::log::MoveRecord;
    use crate::map::*;
    use crate::navigation;
    use crate::reinforcement::{reinforcement_pool, territory_reinforcements};
    use crate::setup::{self, create_random_game, load_scenario, refresh_alive, Scenario};
    use crate::types::*;
    use proptest::prelude::*;

    // ── Helpers ──────────────────────────────────────────────────────────

    /// Board where `owner_of` decides every owner, one army everywhere.
    fn board(players: usize, owner_of: impl Fn(TerritoryId) -> u8) -> GameState {
        let players = (0..players)
            .map(|i| Player {
                id: PlayerId(i as u8),
                color: setup::DEFAULT_COLORS[i].to_string(),
                is_human: i == 0,
                is_alive: true,
                reinforcements: 0,
            })
            .collect();
        let mut state = GameState::new(players);
        for tid in all_territories() {
            *state.territory_mut(tid) = TerritoryState { owner: Some(PlayerId(owner_of(tid))), armies: 1 };
        }
        refresh_alive(&mut state);
        state
    }

    fn set(state: &mut GameState, tid: TerritoryId, owner: u8, armies: u32) {
        *state.territory_mut(tid) = TerritoryState { owner: Some(PlayerId(owner)), armies };
    }

    fn start_phase(state: &mut GameState, player: usize, phase: Phase) {
        state.turn.player_index = player;
        state.turn.phase = phase;
        if phase == Phase::Reinforce {
            let p = state.current_player();
            state.player_mut(p).reinforcements = reinforcement_pool(state, p);
        }
    }

    fn dice(values: &[i64]) -> DiceQueue {
        DiceQueue::from_values(values).unwrap()
    }

    /// Player 2 on northern europe (5) next to ukraine (1), attack phase.
    fn basic_attack_state() -> GameState {
        let mut state = board(3, |t| (t.0 % 2) as u8);
        set(&mut state, NORTHERN_EUROPE, 2, 5);
        set(&mut state, UKRAINE, 0, 1);
        refresh_alive(&mut state);
        start_phase(&mut state, 2, Phase::Attack);
        state
    }

    // ═══════════════════════════════════════════════════════════════════
    // MAP TESTS
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn test_map_size_and_ids() {
        assert_eq!(TERRITORIES.len(), 42);
        for (i, def) in TERRITORIES.iter().enumerate() {
            assert_eq!(def.id.index(), i, "{} out of place", def.key);
        }
        assert_eq!(all_territories().count(), NUM_TERRITORIES);
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        for a in all_territories() {
            assert!(!neighbors(a).contains(&a), "{} borders itself", territory_name(a));
            for &b in neighbors(a) {
                assert!(is_adjacent(b, a), "{} -> {} is one-way", territory(a).key, territory(b).key);
            }
        }
    }

    #[test]
    fn test_board_is_connected() {
        let state = board(1, |_| 0);
        let reach = navigation::reachable_owned(&state, ALASKA, PlayerId(0));
        assert!(reach.iter().all(|&r| r));
    }

    #[test]
    fn test_continent_tables() {
        let sizes: Vec<usize> = CONTINENTS.iter().map(|c| c.territories.len()).collect();
        assert_eq!(sizes, vec![9, 4, 6, 7, 12, 4]);
        let bonuses: Vec<u32> = CONTINENTS.iter().map(|c| c.bonus).collect();
        assert_eq!(bonuses, vec![5, 2, 3, 5, 7, 2]);
        for c in CONTINENTS.iter() {
            for &t in c.territories {
                assert_eq!(continent_of(t), c.id);
            }
        }
    }

    #[test]
    fn test_territory_keys() {
        assert_eq!(territory_by_key("north_africa"), Some(NORTH_AFRICA));
        assert_eq!(territory_by_key("Western_Australia"), Some(WESTERN_AUSTRALIA));
        assert_eq!(territory_by_key("atlantis"), None);
        assert_eq!(territory(SIAM).key, "siam");
        assert_eq!(territory(CENTRAL_AMERICA).key, "central_america");
    }

    // ═══════════════════════════════════════════════════════════════════
    // COMBAT TESTS
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn test_round_defender_wins_ties() {
        let mut q = dice(&[6, 4, 3, 6, 3]);
        let r = resolve_round(3, 2, &mut q).unwrap();
        assert_eq!(r.attacker_dice, vec![6, 4, 3]);
        assert_eq!(r.defender_dice, vec![6, 3]);
        // 6 vs 6 -> defender, 4 vs 3 -> attacker
        assert_eq!((r.attacker_losses, r.defender_losses), (1, 1));
        assert!(q.is_empty());
    }

    #[test]
    fn test_round_dice_counts() {
        assert_eq!(combat::dice_needed(1, 1), 2);
        assert_eq!(combat::dice_needed(2, 5), 4);
        assert_eq!(combat::dice_needed(7, 1), 4);

        let mut q = dice(&[2, 5, 1, 1, 1]);
        let r = resolve_round(2, 1, &mut q).unwrap();
        assert_eq!(r.attacker_dice, vec![5, 2]);
        assert_eq!(r.defender_dice, vec![1]);
        assert_eq!((r.attacker_losses, r.defender_losses), (0, 1));
        assert_eq!(q.remaining(), 2);
    }

    #[test]
    fn test_round_needs_whole_round_of_dice() {
        let mut q = dice(&[6, 6, 6]);
        assert_eq!(
            resolve_round(3, 1, &mut q),
            Err(DiceError::InsufficientDice { needed: 4, remaining: 3 })
        );
        assert_eq!(q.remaining(), 3);
    }

    // ═══════════════════════════════════════════════════════════════════
    // REINFORCEMENT TESTS
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn test_territory_reinforcements() {
        assert_eq!(territory_reinforcements(1), 3);
        assert_eq!(territory_reinforcements(11), 3);
        assert_eq!(territory_reinforcements(12), 4);
        assert_eq!(territory_reinforcements(14), 4);
        assert_eq!(territory_reinforcements(42), 14);
    }

    #[test]
    fn test_pool_with_continent_bonus() {
        // player 0: australia (4) + 10 asian territories = 14 -> 4 + 2
        let mut state = board(2, |t| if t.0 >= 28 { 0 } else { 1 });
        assert_eq!(state.territory_count(PlayerId(0)), 14);
        assert_eq!(reinforcement_pool(&state, PlayerId(0)), 6);

        // take the rest of asia too: 16 territories -> 5 + 2 + 7
        for t in [URAL, SIBERIA] {
            set(&mut state, t, 0, 1);
        }
        assert_eq!(reinforcement_pool(&state, PlayerId(0)), 5 + 2 + 7);
    }

    #[test]
    fn test_pool_counts_extra_continents() {
        let text = scenario_json(r#"[{"name":"extra_cont_east","bonus":4,"territories":["japan",34]}]"#);
        let scenario = Scenario::from_json(&text).unwrap();
        let mut state = load_scenario(&scenario).unwrap();
        assert_eq!(state.continents.len(), 7);
        assert_eq!(state.continents[6].territories, vec![JAPAN, SIAM]);
        // japan is odd (player 1), siam even (player 0)
        assert!(!state.owns_continent(PlayerId(0), ContinentId(6)));
        assert!(!state.owns_continent(PlayerId(1), ContinentId(6)));

        set(&mut state, SIAM, 1, 1);
        assert!(state.owns_continent(PlayerId(1), ContinentId(6)));
        let base = territory_reinforcements(state.territory_count(PlayerId(1)));
        assert_eq!(reinforcement_pool(&state, PlayerId(1)), base + 4);
    }

    // ═══════════════════════════════════════════════════════════════════
    // SCENARIO TESTS
    // ═══════════════════════════════════════════════════════════════════

    /// Two players alternating by id, three armies each, player 1 to move.
    fn scenario_json(continents: &str) -> String {
        let territories: Vec<String> = (0..42)
            .map(|i| format!(r#"{{"owner":{},"armies":3}}"#, i % 2))
            .collect();
        format!(
            r#"{{"players":[{{"color":"red","is_human":false}},{{"color":"blue","is_human":true}}],
                "territories":[{}],
                "turn":{{"player_index":1,"phase":"reinforce","reinforcements":null}},
                "continents":{}}}"#,
            territories.join(","),
            continents
        )
    }

    #[test]
    fn test_load_scenario_list() {
        let state = load_scenario(&Scenario::from_json(&scenario_json("[]")).unwrap()).unwrap();
        assert_eq!(state.players.len(), 2);
        assert!(state.players.iter().all(|p| p.is_alive));
        assert_eq!(state.current_player(), PlayerId(1));
        assert_eq!(state.turn.phase, Phase::Reinforce);
        assert_eq!(state.player(PlayerId(1)).reinforcements, 7);
        assert_eq!(state.armies(JAPAN), 3);
        assert!(!state.log.is_enabled());
        check_invariants(&state).unwrap();
    }

    #[test]
    fn test_load_scenario_by_name_and_long_field_names() {
        let mut entries: Vec<String> = TERRITORIES.iter()
            .map(|t| format!(r#""{}":{{"owning_player":0,"current_armies":2}}"#, t.key))
            .collect();
        entries[SIAM.index()] = r#""siam":{"owning_player":1,"current_armies":9}"#.to_string();
        let text = format!(
            r#"{{"players":[{{"color":"red"}},{{"color":"blue","is_human":true}}],"territories":{{{}}},
                "turn":{{"player_index":0,"phase":"attack"}}}}"#,
            entries.join(",")
        );
        let state = load_scenario(&Scenario::from_json(&text).unwrap()).unwrap();
        assert_eq!(state.owner(SIAM), Some(PlayerId(1)));
        assert_eq!(state.armies(SIAM), 9);
        assert_eq!(state.turn.phase, Phase::Attack);
        assert_eq!(state.player(PlayerId(0)).reinforcements, 0);
    }

    #[test]
    fn test_invalid_scenarios() {
        let bad = [
            r#"{"players":[],"territories":[]}"#,
            r#"{"players":[{"color":"red"}],"territories":[{"owner":0,"armies":1}]}"#,
            r#"{"players":[{"color":"red"}],"territories":{"atlantis":{"owner":0,"armies":1}}}"#,
            "not json",
        ];
        for text in bad {
            let result = Scenario::from_json(text).and_then(|s| load_scenario(&s));
            assert!(matches!(result, Err(EngineError::InvalidScenario(_))), "{text}");
        }

        let zero_armies = scenario_json("[]").replacen(r#""armies":3"#, r#""armies":0"#, 1);
        let s = Scenario::from_json(&zero_armies).unwrap();
        assert!(matches!(load_scenario(&s), Err(EngineError::InvalidScenario(_))));

        let bad_owner = scenario_json("[]").replacen(r#""owner":0"#, r#""owner":5"#, 1);
        let s = Scenario::from_json(&bad_owner).unwrap();
        assert!(matches!(load_scenario(&s), Err(EngineError::InvalidScenario(_))));

        let bad_continent = scenario_json(r#"[{"name":"x","bonus":1,"territories":[99]}]"#);
        let s = Scenario::from_json(&bad_continent).unwrap();
        assert!(matches!(load_scenario(&s), Err(EngineError::InvalidScenario(_))));
    }

    #[test]
    fn test_scenario_with_single_owner_is_over() {
        let mut state = board(2, |_| 0);
        state.turn.phase = Phase::Attack;
        let snapshot = setup::to_scenario(&state);
        let loaded = load_scenario(&snapshot).unwrap();
        assert_eq!(loaded.turn.phase, Phase::GameOver);
        assert_eq!(loaded.winner, Some(PlayerId(0)));
        assert!(!loaded.player(PlayerId(1)).is_alive);
    }

    #[test]
    fn test_random_game_deal() {
        for players in 2..=6 {
            let state = create_random_game(players, 11).unwrap();
            assert!(state.territories.iter().all(|t| t.owner.is_some() && t.armies >= 1));
            for p in 0..players {
                let id = PlayerId(p as u8);
                let total: u32 = state.owned_by(id).iter().map(|&t| state.armies(t)).sum();
                let owned = state.territory_count(id) as u32;
                assert_eq!(total, setup::starting_armies(players).max(owned));
            }
            assert_eq!(state.turn.phase, Phase::Reinforce);
            assert!(state.player(PlayerId(0)).reinforcements >= 3);
        }
        assert!(create_random_game(1, 0).is_err());
        assert!(create_random_game(7, 0).is_err());
    }

    // ═══════════════════════════════════════════════════════════════════
    // ENGINE TESTS
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn test_basic_load_game_and_attack() {
        let mut state = basic_attack_state();
        let mut q = dice(&[6, 5, 4, 1]);

        let outcome = apply_action(&mut state, &mut q, Action::Attack { from: NORTHERN_EUROPE, to: UKRAINE, armies: 4 }).unwrap();
        let ActionOutcome::Attack(report) = outcome else { panic!("expected attack report") };
        assert!(report.captured);
        assert_eq!(report.survivors, 4);
        assert_eq!(report.rounds.len(), 1);
        assert_eq!(state.armies(UKRAINE), 0);
        assert!(matches!(pending(&state), Some(PendingDecision::MoveAfterCapture { max: 4, .. })));

        apply_action(&mut state, &mut q, Action::PostAttackMove { from: NORTHERN_EUROPE, to: UKRAINE, count: 4 }).unwrap();
        assert_eq!(*state.territory(NORTHERN_EUROPE), TerritoryState { owner: Some(PlayerId(2)), armies: 1 });
        assert_eq!(*state.territory(UKRAINE), TerritoryState { owner: Some(PlayerId(2)), armies: 4 });
        assert!(q.is_empty());
        check_invariants(&state).unwrap();
    }

    #[test]
    fn test_capture_arithmetic_with_losses() {
        let mut state = basic_attack_state();
        set(&mut state, NORTHERN_EUROPE, 2, 6);
        set(&mut state, UKRAINE, 0, 2);
        // round 1: 1,1,1 vs 6,6 -> attacker -2; then 6 vs 1,1 and 6 vs 1
        let mut q = dice(&[1, 1, 1, 6, 6, 6, 1, 1, 6, 1]);

        let outcome = apply_action(&mut state, &mut q, Action::Attack { from: NORTHERN_EUROPE, to: UKRAINE, armies: 3 }).unwrap();
        let ActionOutcome::Attack(report) = outcome else { panic!("expected attack report") };
        assert_eq!(report.rounds.len(), 3);
        assert_eq!(report.attacker_losses, 2);
        assert_eq!(report.defender_losses, 2);
        assert_eq!(state.armies(NORTHERN_EUROPE), 4);

        apply_action(&mut state, &mut q, Action::PostAttackMove { from: NORTHERN_EUROPE, to: UKRAINE, count: report.survivors }).unwrap();
        assert_eq!(state.armies(UKRAINE), report.committed - report.attacker_losses);
        assert_eq!(state.armies(NORTHERN_EUROPE), 3);
    }

    #[test]
    fn test_failed_attack_loses_committed_armies() {
        let mut state = basic_attack_state();
        set(&mut state, UKRAINE, 0, 2);
        let mut q = dice(&[1, 6, 6]);
        let outcome = apply_action(&mut state, &mut q, Action::Attack { from: NORTHERN_EUROPE, to: UKRAINE, armies: 1 }).unwrap();
        let ActionOutcome::Attack(report) = outcome else { panic!("expected attack report") };
        assert!(!report.captured);
        assert_eq!(report.survivors, 0);
        assert_eq!(state.armies(NORTHERN_EUROPE), 4);
        assert_eq!(state.armies(UKRAINE), 2);
        assert_eq!(state.owner(UKRAINE), Some(PlayerId(0)));
        assert_eq!(state.pending_capture, None);
    }

    #[test]
    fn test_illegal_attacks_change_nothing() {
        let state = basic_attack_state();
        let cases = [
            Action::Attack { from: NORTHERN_EUROPE, to: UKRAINE, armies: 5 },
            Action::Attack { from: NORTHERN_EUROPE, to: UKRAINE, armies: 0 },
            Action::Attack { from: NORTHERN_EUROPE, to: SIAM, armies: 2 },
            Action::Attack { from: UKRAINE, to: NORTHERN_EUROPE, armies: 1 },
            Action::PostAttackMove { from: NORTHERN_EUROPE, to: UKRAINE, count: 1 },
            Action::Reinforce { tid: NORTHERN_EUROPE, count: 1 },
        ];
        for action in cases {
            let mut s = state.clone();
            let mut q = dice(&[6, 6, 6, 1]);
            let err = apply_action(&mut s, &mut q, action).unwrap_err();
            assert!(matches!(err, EngineError::IllegalMove(_)), "{action:?}: {err}");
            assert_eq!(s.territories, state.territories);
            assert_eq!(q.remaining(), 4);
        }

        // own neighbour
        let mut s = state.clone();
        set(&mut s, SCANDINAVIA, 2, 1);
        let mut q = dice(&[6, 6, 6, 1]);
        assert!(apply_action(&mut s, &mut q, Action::Attack { from: NORTHERN_EUROPE, to: SCANDINAVIA, armies: 1 }).is_err());

        // out-of-range id
        let mut s = state.clone();
        let err = apply_action(&mut s, &mut q, Action::Attack { from: TerritoryId(99), to: UKRAINE, armies: 1 }).unwrap_err();
        assert!(matches!(err, EngineError::InvalidReference(_)));
    }

    #[test]
    fn test_dice_exhausted_midway_is_atomic() {
        let mut state = basic_attack_state();
        set(&mut state, UKRAINE, 0, 2);
        let before = state.clone();
        // first round costs the attacker two, second round has no dice
        let mut q = dice(&[1, 1, 1, 6, 6]);
        let err = apply_action(&mut state, &mut q, Action::Attack { from: NORTHERN_EUROPE, to: UKRAINE, armies: 3 }).unwrap_err();
        assert_eq!(err, EngineError::Dice(DiceError::InsufficientDice { needed: 3, remaining: 0 }));
        assert_eq!(state.territories, before.territories);
        assert_eq!(q.remaining(), 5);
    }

    #[test]
    fn test_capture_blocks_other_actions() {
        let mut state = basic_attack_state();
        let mut q = dice(&[6, 5, 4, 1, 6, 6, 6, 1]);
        apply_action(&mut state, &mut q, Action::Attack { from: NORTHERN_EUROPE, to: UKRAINE, armies: 2 }).unwrap();

        for action in [Action::EndAttack, Action::EndTurn, Action::Attack { from: NORTHERN_EUROPE, to: SCANDINAVIA, armies: 1 }] {
            assert!(apply_action(&mut state, &mut q, action).is_err());
        }
        // wrong endpoints, too many
        assert!(apply_action(&mut state, &mut q, Action::PostAttackMove { from: UKRAINE, to: NORTHERN_EUROPE, count: 1 }).is_err());
        assert!(apply_action(&mut state, &mut q, Action::PostAttackMove { from: NORTHERN_EUROPE, to: UKRAINE, count: 5 }).is_err());
        apply_action(&mut state, &mut q, Action::PostAttackMove { from: NORTHERN_EUROPE, to: UKRAINE, count: 2 }).unwrap();
        assert_eq!(state.armies(NORTHERN_EUROPE), 3);
        assert_eq!(state.armies(UKRAINE), 2);
    }

    #[test]
    fn test_reinforce_flow() {
        let mut state = board(2, |t| (t.0 % 2) as u8);
        start_phase(&mut state, 0, Phase::Reinforce);
        assert_eq!(state.player(PlayerId(0)).reinforcements, 7);
        let mut q = DiceQueue::new();

        assert!(apply_action(&mut state, &mut q, Action::Reinforce { tid: ALASKA, count: 8 }).is_err());
        assert!(apply_action(&mut state, &mut q, Action::Reinforce { tid: GREENLAND, count: 1 }).is_err());
        assert!(apply_action(&mut state, &mut q, Action::EndTurn).is_err());
        assert!(apply_action(&mut state, &mut q, Action::EndAttack).is_err());

        apply_action(&mut state, &mut q, Action::Reinforce { tid: ALASKA, count: 5 }).unwrap();
        assert_eq!(state.turn.phase, Phase::Reinforce);
        apply_action(&mut state, &mut q, Action::Reinforce { tid: ONTARIO, count: 2 }).unwrap();
        assert_eq!(state.turn.phase, Phase::Attack);
        assert_eq!(state.armies(ALASKA), 6);
        assert_eq!(state.armies(ONTARIO), 3);
        assert_eq!(pending(&state), Some(PendingDecision::AttackOrEnd { player: PlayerId(0) }));
    }

    #[test]
    fn test_reinforce_rejects_army_overflow() {
        let mut state = board(2, |t| (t.0 % 2) as u8);
        start_phase(&mut state, 0, Phase::Reinforce);
        state.territory_mut(ALASKA).armies = u32::MAX - 2;
        let mut q = DiceQueue::new();

        let result = apply_action(&mut state, &mut q, Action::Reinforce { tid: ALASKA, count: 5 });
        assert!(matches!(result, Err(EngineError::IllegalMove(_))));
        assert_eq!(state.armies(ALASKA), u32::MAX - 2);
        assert_eq!(state.player(PlayerId(0)).reinforcements, 7);
    }

    #[test]
    fn test_scenario_army_counts_are_capped() {
        let huge = scenario_json("[]").replacen(r#""armies":3"#, r#""armies":4294967295"#, 1);
        let s = Scenario::from_json(&huge).unwrap();
        assert!(matches!(load_scenario(&s), Err(EngineError::InvalidScenario(_))));

        let at_cap = scenario_json("[]")
            .replacen(r#""armies":3"#, &format!(r#""armies":{}"#, setup::MAX_SCENARIO_ARMIES), 1);
        let state = load_scenario(&Scenario::from_json(&at_cap).unwrap()).unwrap();
        assert_eq!(state.armies(ALASKA), setup::MAX_SCENARIO_ARMIES);

        let big_bonus = scenario_json(r#"[{"name":"x","bonus":4294967295,"territories":[0]}]"#);
        let s = Scenario::from_json(&big_bonus).unwrap();
        assert!(matches!(load_scenario(&s), Err(EngineError::InvalidScenario(_))));

        let big_pool = scenario_json("[]").replacen(r#""reinforcements":null"#, r#""reinforcements":4000000000"#, 1);
        let s = Scenario::from_json(&big_pool).unwrap();
        assert!(matches!(load_scenario(&s), Err(EngineError::InvalidScenario(_))));
    }

    #[test]
    fn test_fortify_rules() {
        // player 0 owns north america, player 1 the rest
        let mut state = board(2, |t| if t.0 <= 8 { 0 } else { 1 });
        set(&mut state, ALASKA, 0, 6);
        set(&mut state, VENEZUELA, 1, 1);
        set(&mut state, BRAZIL, 0, 1); // cut off from north america
        refresh_alive(&mut state);
        start_phase(&mut state, 0, Phase::Attack);
        let mut q = DiceQueue::new();

        assert!(apply_action(&mut state, &mut q, Action::Fortify { from: ALASKA, to: BRAZIL, count: 1 }).is_err());
        assert!(apply_action(&mut state, &mut q, Action::Fortify { from: ALASKA, to: ALASKA, count: 1 }).is_err());
        assert!(apply_action(&mut state, &mut q, Action::Fortify { from: ALASKA, to: CENTRAL_AMERICA, count: 6 }).is_err());

        apply_action(&mut state, &mut q, Action::Fortify { from: ALASKA, to: CENTRAL_AMERICA, count: 5 }).unwrap();
        assert_eq!(state.armies(ALASKA), 1);
        assert_eq!(state.armies(CENTRAL_AMERICA), 6);
        assert_eq!(state.turn.phase, Phase::Fortify);

        // once per turn, and no attacking afterwards
        assert!(apply_action(&mut state, &mut q, Action::Fortify { from: CENTRAL_AMERICA, to: ALASKA, count: 1 }).is_err());
        assert!(apply_action(&mut state, &mut q, Action::Attack { from: CENTRAL_AMERICA, to: VENEZUELA, armies: 1 }).is_err());
        assert!(matches!(apply_action(&mut state, &mut q, Action::EndTurn), Ok(ActionOutcome::TurnPassed { .. })));
        assert!(!state.fortified);
    }

    #[test]
    fn test_end_turn_skips_dead_players() {
        let mut state = board(3, |t| if t.0 < 20 { 0 } else { 2 });
        assert!(!state.player(PlayerId(1)).is_alive);
        start_phase(&mut state, 0, Phase::Attack);
        let mut q = DiceQueue::new();

        apply_action(&mut state, &mut q, Action::EndAttack).unwrap();
        let outcome = apply_action(&mut state, &mut q, Action::EndTurn).unwrap();
        // 22 territories -> 7; europe (19..=25) is split, asia and australia are whole
        assert_eq!(outcome, ActionOutcome::TurnPassed { next: PlayerId(2), reinforcements: 7 + 7 + 2 });
        assert_eq!(state.turn.phase, Phase::Reinforce);
        assert_eq!(state.turn.turn_number, 2);

        // player 2 must place before ending
        assert!(apply_action(&mut state, &mut q, Action::EndTurn).is_err());
    }

    #[test]
    fn test_elimination_and_game_over() {
        // three players: player 2 holds only ukraine
        let mut state = basic_attack_state();
        for t in all_territories() {
            if state.owner(t) == Some(PlayerId(2)) && t != NORTHERN_EUROPE {
                set(&mut state, t, 1, 1);
            }
        }
        set(&mut state, NORTHERN_EUROPE, 0, 5);
        set(&mut state, UKRAINE, 2, 1);
        refresh_alive(&mut state);
        start_phase(&mut state, 0, Phase::Attack);

        let mut q = dice(&[6, 6, 6, 1]);
        let outcome = apply_action(&mut state, &mut q, Action::Attack { from: NORTHERN_EUROPE, to: UKRAINE, armies: 3 }).unwrap();
        let ActionOutcome::Attack(report) = outcome else { panic!("expected attack report") };
        assert_eq!(report.eliminated, Some(PlayerId(2)));
        assert!(!state.player(PlayerId(2)).is_alive);
        assert_eq!(state.alive_count(), 2);
        assert_eq!(state.winner, None);
        assert!(state.pending_capture.is_some());
    }

    #[test]
    fn test_last_capture_ends_game() {
        let mut state = board(2, |t| if t == UKRAINE { 1 } else { 0 });
        set(&mut state, NORTHERN_EUROPE, 0, 5);
        start_phase(&mut state, 0, Phase::Attack);
        state.log.turn_on();

        let mut q = dice(&[6, 6, 6, 1]);
        apply_action(&mut state, &mut q, Action::Attack { from: NORTHERN_EUROPE, to: UKRAINE, armies: 3 }).unwrap();
        assert_eq!(state.winner, Some(PlayerId(0)));
        assert_eq!(state.turn.phase, Phase::GameOver);
        assert_eq!(state.pending_capture, None);
        assert_eq!(state.armies(UKRAINE), 3);
        assert_eq!(state.armies(NORTHERN_EUROPE), 2);
        assert_eq!(pending(&state), None);
        assert_eq!(state.log.call_lines(), vec!["api_attack(23,24,3)", "api_post_attack_move(23,24,3)"]);
        check_invariants(&state).unwrap();

        assert_eq!(apply_action(&mut state, &mut q, Action::EndTurn), Err(EngineError::GameOver(PlayerId(0))));
        assert!(force_next_turn(&mut state).is_err());
    }

    #[test]
    fn test_force_next_turn() {
        let mut state = board(2, |t| (t.0 % 2) as u8);
        start_phase(&mut state, 0, Phase::Reinforce);
        state.log.turn_on();

        let outcome = force_next_turn(&mut state).unwrap();
        assert!(matches!(outcome, ActionOutcome::TurnPassed { next: PlayerId(1), .. }));
        assert_eq!(state.player(PlayerId(0)).reinforcements, 0);

        // settle a pending capture on the way out
        let mut state = basic_attack_state();
        let mut q = dice(&[6, 6, 6, 1]);
        apply_action(&mut state, &mut q, Action::Attack { from: NORTHERN_EUROPE, to: UKRAINE, armies: 3 }).unwrap();
        force_next_turn(&mut state).unwrap();
        assert_eq!(state.armies(UKRAINE), 3);
        assert_eq!(state.armies(NORTHERN_EUROPE), 2);
        assert_eq!(state.current_player(), PlayerId(0));
        check_invariants(&state).unwrap();
    }

    #[test]
    fn test_move_log() {
        let mut state = board(2, |t| (t.0 % 2) as u8);
        start_phase(&mut state, 0, Phase::Reinforce);
        let mut q = DiceQueue::new();

        apply_action(&mut state, &mut q, Action::Reinforce { tid: ALASKA, count: 1 }).unwrap();
        assert!(state.log.is_empty(), "log is off by default");

        state.log.turn_on();
        apply_action(&mut state, &mut q, Action::Reinforce { tid: GREENLAND, count: 6 }).unwrap_err();
        apply_action(&mut state, &mut q, Action::Reinforce { tid: CENTRAL_AMERICA, count: 6 }).unwrap();
        apply_action(&mut state, &mut q, Action::EndAttack).unwrap();
        apply_action(&mut state, &mut q, Action::EndTurn).unwrap();
        assert_eq!(state.log.call_text(), "api_reinforce(8,6)\napi_end_attack()\napi_end_turn()");
        assert_eq!(state.log.entries()[0].record, MoveRecord::Reinforce { tid: CENTRAL_AMERICA, count: 6 });

        state.log.reset();
        assert!(state.log.is_empty());
        state.log.turn_off();
        force_next_turn(&mut state).unwrap();
        assert!(state.log.is_empty());
    }

    // ═══════════════════════════════════════════════════════════════════
    // FULL GAME TESTS
    // ═══════════════════════════════════════════════════════════════════

    fn random_action(state: &GameState, rng: &mut impl rand::Rng) -> Action {
        use rand::seq::SliceRandom;
        let player = state.current_player();
        match pending(state).expect("game not over") {
            PendingDecision::PlaceReinforcements { remaining, .. } => {
                let owned = state.owned_by(player);
                let tid = *owned.choose(rng).unwrap();
                Action::Reinforce { tid, count: rng.gen_range(1..=remaining) }
            }
            PendingDecision::AttackOrEnd { .. } => {
                let options = navigation::attack_options(state, player);
                if options.is_empty() || rng.gen_bool(0.1) {
                    return Action::EndAttack;
                }
                let &(from, to) = options.choose(rng).unwrap();
                let max = state.armies(from) - 1;
                Action::Attack { from, to, armies: rng.gen_range(1..=max.min(4)) }
            }
            PendingDecision::MoveAfterCapture { capture, max, .. } => {
                Action::PostAttackMove { from: capture.from, to: capture.to, count: rng.gen_range(1..=max) }
            }
            PendingDecision::FortifyOrEnd { .. } => Action::EndTurn,
        }
    }

    #[test]
    fn test_random_games_keep_invariants() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        for seed in 0..5u64 {
            let mut state = create_random_game(2 + (seed as usize % 4), seed).unwrap();
            let mut q = DiceQueue::new();
            q.set_standard(&dice::generate_standard(seed, dice::STANDARD_DICE_LEN)).unwrap();
            q.reset_to_standard();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut alive = state.alive_count();

            for _ in 0..20_000 {
                if state.winner.is_some() {
                    break;
                }
                q.replenish_if_low();
                let action = random_action(&state, &mut rng);
                apply_action(&mut state, &mut q, action)
                    .unwrap_or_else(|e| panic!("seed {seed}: {action:?} rejected: {e}"));
                check_invariants(&state).unwrap_or_else(|e| panic!("seed {seed}: {e}"));
                assert!(state.alive_count() <= alive, "alive count grew");
                alive = state.alive_count();
            }
        }
    }

    #[test]
    fn test_territory_snapshot_is_idempotent() {
        let state = create_random_game(4, 3).unwrap();
        let a = serde_json::to_string(&state.territories).unwrap();
        let b = serde_json::to_string(&state.territories).unwrap();
        assert_eq!(a, b);
        let reloaded = load_scenario(&setup::to_scenario(&state)).unwrap();
        assert_eq!(reloaded.territories, state.territories);
    }

    // ═══════════════════════════════════════════════════════════════════
    // PROPERTIES
    // ═══════════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn prop_round_losses_match_pairs(
            attacking in 1u32..10,
            defending in 1u32..10,
            values in proptest::collection::vec(1i64..=6, 5),
        ) {
            let mut q = DiceQueue::from_values(&values).unwrap();
            let r = resolve_round(attacking, defending, &mut q).unwrap();
            let pairs = attacking.min(3).min(defending.min(2));
            prop_assert_eq!(r.attacker_losses + r.defender_losses, pairs);
            prop_assert!(r.attacker_dice.windows(2).all(|w| w[0] >= w[1]));
            prop_assert!(r.defender_dice.windows(2).all(|w| w[0] >= w[1]));
            prop_assert_eq!(q.remaining(), 5 - combat::dice_needed(attacking, defending));
        }

        #[test]
        fn prop_capture_conserves_armies(
            from_armies in 2u32..12,
            defenders in 1u32..4,
            values in proptest::collection::vec(1i64..=6, 200),
        ) {
            let mut state = basic_attack_state();
            set(&mut state, NORTHERN_EUROPE, 2, from_armies);
            set(&mut state, UKRAINE, 0, defenders);
            let committed = (from_armies - 1).min(3);
            let total = from_armies + defenders;
            let mut q = DiceQueue::from_values(&values).unwrap();

            let outcome = apply_action(&mut state, &mut q, Action::Attack { from: NORTHERN_EUROPE, to: UKRAINE, armies: committed }).unwrap();
            let ActionOutcome::Attack(report) = outcome else { unreachable!() };
            prop_assert_eq!(state.armies(NORTHERN_EUROPE) + state.armies(UKRAINE),
                total - report.attacker_losses - report.defender_losses);
            if report.captured {
                apply_action(&mut state, &mut q, Action::PostAttackMove { from: NORTHERN_EUROPE, to: UKRAINE, count: report.survivors }).unwrap();
                prop_assert_eq!(state.armies(UKRAINE), committed - report.attacker_losses);
            } else {
                prop_assert_eq!(report.attacker_losses, committed);
            }
            check_invariants(&state).map_err(TestCaseError::fail)?;
        }
    }
}
