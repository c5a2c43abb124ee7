//! Integration tests for the project manager.

use fundsim::core::config::{ProjectEconomics, TemplateBounds};
use fundsim::core::ledger::FundLedger;
use fundsim::core::types::{Project, SubProject, PROJECT_LENGTH};
use fundsim::input::TemplatePool;
use fundsim::portfolio::{ProjectManager, RunContext};
use fundsim::risk::RiskModel;
use fundsim::strategies::PolicyKind;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn with_risk(created_at: usize, risk: [bool; PROJECT_LENGTH]) -> Project {
    let mut stages = [SubProject::new(false, 0, 10); PROJECT_LENGTH];
    for (stage, has_risk) in stages.iter_mut().zip(risk) {
        stage.has_risk = has_risk;
    }
    Project::new(created_at, stages)
}

/// Project started in year 1 (more accrued value) and one started in year 4.
fn two_projects() -> (Project, Project) {
    let high_value = with_risk(1, [false, true, true, false, false, true]);
    let low_value = with_risk(4, [true, true, false, false, false, true]);
    (high_value, low_value)
}

#[test]
fn test_small_deficit_sells_least_valuable() {
    let (high_value, low_value) = two_projects();
    let mut manager = ProjectManager::new(PolicyKind::Greedy, ProjectEconomics::default())
        .with_projects(vec![high_value.clone(), low_value.clone()]);
    let mut ledger = FundLedger::new(&[20; 9]);

    let excess = manager.reacquire_deficit_value(-3, 5, &mut ledger).unwrap();

    assert_eq!(manager.current_projects(), &[high_value]);
    assert_eq!(manager.discarded_projects(), &[low_value]);
    assert_eq!(excess, 7);
}

#[test]
fn test_large_deficit_sells_both() {
    let (high_value, low_value) = two_projects();
    let mut manager = ProjectManager::new(PolicyKind::MinusOne, ProjectEconomics::default())
        .with_projects(vec![high_value.clone(), low_value.clone()]);
    let mut ledger = FundLedger::new(&[20; 9]);

    let excess = manager.reacquire_deficit_value(-15, 5, &mut ledger).unwrap();

    assert!(manager.current_projects().is_empty());
    assert_eq!(manager.discarded_projects(), &[high_value, low_value]);
    assert_eq!(excess, 5);
}

#[test]
fn test_unviable_deficit_liquidates_all_without_cash() {
    let (high_value, low_value) = two_projects();
    let mut manager = ProjectManager::new(PolicyKind::Greedy, ProjectEconomics::default())
        .with_projects(vec![high_value, low_value]);
    let mut ledger = FundLedger::new(&[20; 9]);

    let excess = manager.reacquire_deficit_value(-25, 5, &mut ledger).unwrap();

    assert_eq!(excess, 0);
    assert!(manager.current_projects().is_empty());
    assert_eq!(manager.discarded_projects().len(), 2);
    // Year 5 gets both projects' stages back, year 9 only the younger one's
    assert_eq!(ledger.capacity(5), 40);
    assert_eq!(ledger.capacity(6), 40);
    assert_eq!(ledger.capacity(9), 30);
}

#[test]
fn test_collections_stay_disjoint_over_runs() {
    let risky = with_risk(0, [true; PROJECT_LENGTH]);
    let quiet = with_risk(0, [false, false, true, false, false, false]);
    let templates = TemplatePool::new(vec![risky, quiet], TemplateBounds::default()).unwrap();
    let funds = FundLedger::standard();
    let risk = RiskModel::standard().unwrap();
    let ctx = RunContext {
        funds: &funds,
        templates: &templates,
        risk: &risk,
    };

    for seed in 0..20 {
        for kind in [PolicyKind::Greedy, PolicyKind::MinusOne, PolicyKind::Optimal] {
            let mut manager = ProjectManager::new(kind, ProjectEconomics::default());
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let portfolio = manager.run(&ctx, &mut rng).unwrap();

            // Running projects are inside their window, finished ones ran all
            // six stages, and nothing is counted twice.
            assert!(manager.current_projects().iter().all(|p| p.is_active(9) && p.created_at >= 5));
            assert!(manager.completed_projects().iter().all(|p| p.created_at <= 4));
            assert!(manager.discarded_projects().iter().all(|p| p.created_at <= 9));

            let finished = manager.completed_projects().len() as i64;
            assert!(portfolio.value[8] >= finished * 90);
        }
    }
}

#[test]
fn test_run_resets_previous_state() {
    let templates =
        TemplatePool::new(vec![with_risk(0, [false; PROJECT_LENGTH])], TemplateBounds::default())
            .unwrap();
    let funds = FundLedger::standard();
    let risk = RiskModel::standard().unwrap();
    let ctx = RunContext {
        funds: &funds,
        templates: &templates,
        risk: &risk,
    };

    let mut manager = ProjectManager::new(PolicyKind::Greedy, ProjectEconomics::default());
    let first = manager.run(&ctx, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
    let second = manager.run(&ctx, &mut ChaCha8Rng::seed_from_u64(2)).unwrap();

    assert_eq!(first, second);
    assert_eq!(manager.completed_projects().len(), 5);
}
