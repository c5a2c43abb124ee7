//! Property tests for the liquidation search against a brute-force reference.

use fundsim::core::types::{Amount, Project, SubProject, PROJECT_LENGTH};
use fundsim::portfolio::find_optimal_closures;
use proptest::prelude::*;

const YEAR: usize = 6;
const STAGE_VALUE: Amount = 15;

fn project(created_at: usize, salvage: Amount) -> Project {
    Project::new(
        created_at,
        [SubProject::new(false, 10 - salvage, salvage); PROJECT_LENGTH],
    )
}

fn projects_strategy() -> impl Strategy<Value = Vec<Project>> {
    prop::collection::vec((1usize..=YEAR, 0 as Amount..=10), 1..=8)
        .prop_map(|specs| specs.into_iter().map(|(c, s)| project(c, s)).collect())
}

/// All index subsets of size `k` in lexicographic order.
fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    fn extend(start: usize, n: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for i in start..n {
            current.push(i);
            extend(i + 1, n, k, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    extend(0, n, k, &mut Vec::new(), &mut out);
    out
}

/// First minimum-value viable subset in size-then-lexicographic order.
fn brute_force(deficit: Amount, projects: &[Project]) -> Option<(Vec<usize>, Amount)> {
    let salvage = |i: usize| projects[i].sub_projects[YEAR - projects[i].created_at].salvageable_cost;
    let value = |i: usize| projects[i].current_value(YEAR, STAGE_VALUE);

    let mut best: Option<(Vec<usize>, Amount)> = None;
    for k in 1..=projects.len() {
        for subset in combinations(projects.len(), k) {
            if deficit + subset.iter().map(|&i| salvage(i)).sum::<Amount>() < 0 {
                continue;
            }
            let total: Amount = subset.iter().map(|&i| value(i)).sum();
            if best.as_ref().map_or(true, |(_, v)| total < *v) {
                best = Some((subset, total));
            }
        }
    }
    best
}

proptest! {
    #[test]
    fn test_closure_matches_brute_force(projects in projects_strategy(), shortfall in 1 as Amount..=60) {
        let deficit = -shortfall;
        let plan = find_optimal_closures(deficit, &projects, YEAR, STAGE_VALUE).unwrap();
        let expected = brute_force(deficit, &projects);

        match (plan, expected) {
            (Some(plan), Some((indices, value))) => {
                prop_assert_eq!(&plan.indices, &indices);
                prop_assert_eq!(plan.value, value);
                prop_assert!(plan.excess(deficit) >= 0);
            }
            (None, None) => {}
            (plan, expected) => prop_assert!(false, "search {:?} vs brute force {:?}", plan, expected),
        }
    }

    #[test]
    fn test_none_only_when_everything_is_not_enough(projects in projects_strategy(), shortfall in 1 as Amount..=60) {
        let deficit = -shortfall;
        let total: Amount = projects
            .iter()
            .map(|p| p.sub_projects[YEAR - p.created_at].salvageable_cost)
            .sum();
        let plan = find_optimal_closures(deficit, &projects, YEAR, STAGE_VALUE).unwrap();
        prop_assert_eq!(plan.is_none(), deficit + total < 0);
    }
}

#[test]
fn test_positive_deficit_is_rejected() {
    assert!(find_optimal_closures(0, &[project(1, 5)], YEAR, STAGE_VALUE).is_err());
}
