use rand::{rngs::StdRng, Rng, SeedableRng};
use votecore::model::{
    Coalition, CoalitionTotal, PartyShare, ResultRecord, ResultsTable, TurnoutSplit,
};

/// Configuration for generating synthetic results from a template table.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Maximum shift, in percentage points, applied to each share.
    pub jitter: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            jitter: 4.0,
        }
    }
}

impl GeneratorConfig {
    fn normalized_jitter(&self) -> f64 {
        self.jitter.abs().min(25.0)
    }
}

/// Perturbs every record of `template`, keeping the table internally consistent.
///
/// Coalition shares are renormalized to 100, party shares are rescaled to
/// their coalition, and the totals and turnout split are recomputed from the
/// municipality rows. Missing values stay missing.
pub fn synthesize(template: &ResultsTable, config: &GeneratorConfig) -> ResultsTable {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let jitter = config.normalized_jitter();

    let municipalities: Vec<ResultRecord> = template
        .municipalities
        .iter()
        .map(|record| perturb_record(record, jitter, &mut rng))
        .collect();
    let urban_units = template
        .urban_units
        .iter()
        .map(|record| perturb_record(record, jitter, &mut rng))
        .collect();

    let coalitions = recompute_totals(&template.coalitions, &municipalities);
    let turnout = template
        .turnout
        .as_ref()
        .map(|split| recompute_turnout(split, &municipalities));

    ResultsTable {
        municipalities,
        urban_units,
        coalitions,
        turnout,
    }
}

fn perturb_record(record: &ResultRecord, jitter: f64, rng: &mut StdRng) -> ResultRecord {
    let mut next = record.clone();

    if let (Some(left), Some(right), Some(other)) = (record.left, record.right, record.other) {
        let left = shift(left, jitter, rng);
        let right = shift(right, jitter, rng);
        let other = shift(other, jitter / 4.0, rng);
        let sum = left + right + other;
        if sum > 0.0 {
            let left = round2(left * 100.0 / sum);
            let right = round2(right * 100.0 / sum);
            next.left = Some(left);
            next.right = Some(right);
            next.other = Some(round2(100.0 - left - right));
        }
    }

    next.left_parties = rescale_parties(&record.left_parties, record.left, next.left);
    next.right_parties = rescale_parties(&record.right_parties, record.right, next.right);
    next.turnout = record
        .turnout
        .map(|turnout| round2(shift(turnout, jitter, rng).min(100.0)));
    next
}

fn rescale_parties(parties: &[PartyShare], old: Option<f64>, new: Option<f64>) -> Vec<PartyShare> {
    let factor = match (old, new) {
        (Some(old), Some(new)) if old > 0.0 => new / old,
        _ => 1.0,
    };
    parties
        .iter()
        .map(|party| PartyShare {
            party: party.party.clone(),
            share: party.share.map(|share| round2(share * factor)),
        })
        .collect()
}

fn recompute_totals(
    template: &[CoalitionTotal],
    municipalities: &[ResultRecord],
) -> Vec<CoalitionTotal> {
    if template.is_empty() {
        return Vec::new();
    }
    let valid_votes: i64 = template.iter().map(|total| total.votes).sum();
    let means: Vec<f64> = Coalition::ALL
        .iter()
        .map(|&side| mean(municipalities.iter().map(|r| r.share(side))))
        .collect();
    let sum: f64 = means.iter().sum();
    if sum <= 0.0 {
        return template.to_vec();
    }

    Coalition::ALL
        .iter()
        .zip(means)
        .map(|(coalition, share)| {
            let percent = round2(share * 100.0 / sum);
            let votes = (valid_votes as f64 * percent / 100.0).round() as i64;
            CoalitionTotal::new(coalition.label(), votes, percent)
        })
        .collect()
}

fn recompute_turnout(template: &TurnoutSplit, municipalities: &[ResultRecord]) -> TurnoutSplit {
    let electorate = template.voted.votes + template.abstained.votes;
    let turnout = mean(municipalities.iter().map(|r| r.turnout));
    if turnout <= 0.0 {
        return template.clone();
    }
    let percent = round2(turnout);
    let voted = (electorate as f64 * percent / 100.0).round() as i64;
    TurnoutSplit {
        voted: CoalitionTotal::new(template.voted.name.clone(), voted, percent),
        abstained: CoalitionTotal::new(
            template.abstained.name.clone(),
            electorate - voted,
            round2(100.0 - percent),
        ),
    }
}

fn shift(value: f64, jitter: f64, rng: &mut StdRng) -> f64 {
    if jitter <= 0.0 {
        return value;
    }
    (value + rng.gen_range(-jitter..jitter)).max(0.0)
}

/// Mean of the present values; zero when every value is missing.
fn mean(values: impl Iterator<Item = Option<f64>>) -> f64 {
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        return 0.0;
    }
    present.iter().sum::<f64>() / present.len() as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
