//! Tests for the training pipeline: episode loop, absorption, early stop

mod common;

use common::{Broken, EventLog, OneStep, Treadmill};
use tabular_rl::{
    Error,
    pipeline::{SharedObserver, TrainingConfig, TrainingPipeline},
    ports::{Agent, Environment, TdParams},
    q_learning::{AgentKind, QLearningAgent, QTable, SarsaAgent},
};

fn config(max_episode: usize, max_step: usize) -> TrainingConfig {
    TrainingConfig {
        max_episode,
        max_step,
        max_succeeded_episode: None,
    }
}

fn table_for(env: &dyn Environment, init: f64) -> QTable {
    QTable::new(env.state_size(), env.action_size(), init).unwrap()
}

#[test]
fn test_terminal_row_is_cleared_before_learning() {
    for kind in [AgentKind::QLearning, AgentKind::Sarsa] {
        let mut agent = kind.build(TdParams::new(1.0, 1.0, 0.0), Some(1));
        let mut env = OneStep::default();
        let mut table = table_for(&env, 5.0);

        let mut pipeline = TrainingPipeline::new(config(1, 10));
        let result = pipeline
            .run(agent.as_mut(), &mut env, &mut table)
            .unwrap();

        assert_eq!(result.returns, vec![1.0]);
        // Target is r + γ·0, not r + γ·5.
        assert_eq!(table.get(0, 0), 1.0, "{kind}");
        assert_eq!(table.get(0, 1), 5.0, "{kind}");
        assert_eq!(table.row(1), &[0.0, 0.0], "{kind}");
    }
}

#[test]
fn test_returns_are_kept_per_episode() {
    let mut agent = QLearningAgent::with_seed(TdParams::new(0.5, 0.9, 0.0), 3);
    let mut env = OneStep {
        reward_per_episode: true,
        ..OneStep::default()
    };
    let mut table = table_for(&env, 0.0);

    let mut pipeline = TrainingPipeline::new(config(3, 10));
    let result = pipeline.run(&mut agent, &mut env, &mut table).unwrap();

    assert_eq!(result.returns, vec![1.0, 2.0, 3.0]);
    assert_eq!(result.final_return(), Some(3.0));
    assert!((result.mean_return() - 2.0).abs() < 1e-12);
}

#[test]
fn test_early_stop_after_consecutive_successes() {
    let mut agent = SarsaAgent::with_seed(TdParams::new(0.5, 0.9, 0.1), 5);
    let mut env = OneStep::default();
    let mut table = table_for(&env, 0.0);

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        max_succeeded_episode: Some(3),
        ..config(10, 10)
    });
    let result = pipeline.run(&mut agent, &mut env, &mut table).unwrap();

    assert!(result.stopped_early);
    assert_eq!(result.episodes_run, 3);
    assert_eq!(result.returns.len(), 3);
    assert_eq!(result.successes, 3);
}

#[test]
fn test_no_early_stop_without_successes() {
    let mut agent = QLearningAgent::with_seed(TdParams::new(0.5, 0.9, 0.1), 5);
    let mut env = Treadmill;
    let mut table = table_for(&env, 0.0);

    let mut pipeline = TrainingPipeline::new(TrainingConfig {
        max_succeeded_episode: Some(1),
        ..config(4, 3)
    });
    let result = pipeline.run(&mut agent, &mut env, &mut table).unwrap();

    assert!(!result.stopped_early);
    assert_eq!(result.episodes_run, 4);
    assert_eq!(result.successes, 0);
}

#[test]
fn test_step_limit_caps_unfinished_episodes() {
    let log = SharedObserver::new(EventLog::default());
    let mut agent = QLearningAgent::with_seed(TdParams::new(0.5, 0.9, 0.1), 9);
    let mut env = Treadmill;
    let mut table = table_for(&env, 0.0);

    let mut pipeline = TrainingPipeline::new(config(2, 5)).with_observer(Box::new(log.clone()));
    let result = pipeline.run(&mut agent, &mut env, &mut table).unwrap();

    // Initial record plus one per step, each worth -1.
    assert_eq!(result.returns, vec![-6.0, -6.0]);
    {
        let log = log.lock();
        assert_eq!(log.summaries.len(), 2);
        for summary in &log.summaries {
            assert_eq!(summary.steps, 5);
            assert!(!summary.finished);
            assert!(!summary.success);
        }
    }

    let history = pipeline
        .run_episode(2, &mut agent, &mut env, &mut table)
        .unwrap();
    assert_eq!(history.len(), 6);
}

#[test]
fn test_observer_event_order() {
    let log = SharedObserver::new(EventLog::default());
    let mut agent = QLearningAgent::with_seed(TdParams::new(0.5, 0.9, 0.0), 1);
    let mut env = OneStep::default();
    let mut table = table_for(&env, 0.0);

    let mut pipeline = TrainingPipeline::new(config(1, 10)).with_observer(Box::new(log.clone()));
    pipeline.run(&mut agent, &mut env, &mut table).unwrap();
    pipeline.evaluate(&mut agent, &mut env, &mut table).unwrap();

    let expected = [
        "training_start 1",
        "episode_start 0",
        "step 0 0",
        "step 0 1",
        "episode_end 0",
        "training_end",
        "evaluation_end",
    ];
    assert_eq!(log.lock().events, expected);
}

#[test]
fn test_evaluation_is_frozen_and_keeps_history() {
    let log = SharedObserver::new(EventLog::default());
    let mut agent = QLearningAgent::with_seed(TdParams::new(0.5, 0.9, 0.5), 2);
    let mut env = OneStep::default();
    let mut table = table_for(&env, 0.0);
    table.set(0, 1, 3.0);
    let before = table.clone();

    let mut pipeline = TrainingPipeline::new(config(0, 10)).with_observer(Box::new(log.clone()));
    let history = pipeline.evaluate(&mut agent, &mut env, &mut table).unwrap();

    assert_eq!(agent.params(), TdParams::new(0.0, 0.9, 0.0));
    // Only the terminal row is touched (absorption), and it was already zero.
    assert_eq!(table, before);

    assert_eq!(history.len(), 2);
    let first = &history.records()[0];
    assert_eq!((first.action, first.state, first.reward), (1, 0, 0.0));
    let last = &history.records()[1];
    assert_eq!((last.action, last.state, last.reward), (1, 1, 1.0));
    assert_eq!(history.total_return(), 1.0);
    {
        let log = log.lock();
        assert_eq!(log.evaluation.as_ref(), Some(&history));
        assert!(log.summaries.is_empty());
        assert_eq!(log.events, ["evaluation_end"]);
    }

    // The pipeline keeps its observers after evaluating.
    pipeline.run(&mut agent, &mut env, &mut table).unwrap();
    assert_eq!(log.lock().events.last().map(String::as_str), Some("training_end"));
}

#[test]
fn test_environment_error_abandons_run() {
    let log = SharedObserver::new(EventLog::default());
    let mut agent = QLearningAgent::with_seed(TdParams::new(0.5, 0.9, 0.0), 1);
    let mut env = Broken;
    let mut table = table_for(&env, 0.0);

    let mut pipeline = TrainingPipeline::new(config(3, 10)).with_observer(Box::new(log.clone()));
    let err = pipeline.run(&mut agent, &mut env, &mut table).unwrap_err();

    assert!(matches!(err, Error::ActionOutOfRange { .. }));
    assert!(!log.lock().events.iter().any(|e| e == "training_end"));
}
