use once_cell::sync::Lazy;

/// Comparison pools for percentile computation. Every group owns the set of
/// position codes it accepts and the composite score columns the upstream
/// producer ships for it. Percentiles for those columns are only ever computed
/// inside one group's subset of a scoped pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleGroup {
    Goalkeeper,
    FullBack,
    CentreBack,
    Midfield,
    Winger,
    Striker,
}

impl RoleGroup {
    pub const ALL: [RoleGroup; 6] = [
        RoleGroup::Goalkeeper,
        RoleGroup::FullBack,
        RoleGroup::CentreBack,
        RoleGroup::Midfield,
        RoleGroup::Winger,
        RoleGroup::Striker,
    ];

    pub fn codes(self) -> &'static [&'static str] {
        match self {
            RoleGroup::Goalkeeper => &["POR", "GK", "PORTERO", "GOALKEEPER"],
            RoleGroup::FullBack => &["LI", "LD", "CAI", "CAD"],
            RoleGroup::CentreBack => &["DFC"],
            RoleGroup::Midfield => &["MCD", "MC", "MCO"],
            RoleGroup::Winger => &["EI", "MI", "ED", "MD"],
            RoleGroup::Striker => &["DC", "SDI", "SDD"],
        }
    }

    pub fn score_columns(self) -> &'static [&'static str] {
        match self {
            RoleGroup::Goalkeeper => &[
                "Score GK Keeper",
                "Score GK Shot Stopper",
                "Score GK Footwork",
                "Score GK Total",
            ],
            RoleGroup::FullBack => &[
                "Score Full Back Generic",
                "Score Full Back Defensive",
                "Score Full Back Offensive",
                "Score Full Back Total",
            ],
            RoleGroup::CentreBack => &[
                "Score Centre Back Generic",
                "Score Centre Back Defensive",
                "Score Centre Back Build-Up",
                "Score Centre Back Total",
            ],
            RoleGroup::Midfield => &[
                "Score Midfield Generic",
                "Score Midfield Holding",
                "Score Midfield Box-to-Box",
                "Score Midfield Attacking",
            ],
            RoleGroup::Winger => &[
                "Score Winger Generic",
                "Score Winger Wide Out",
                "Score Winger Arriving",
                "Score Winger Link-Up",
                "Score Winger Total",
            ],
            RoleGroup::Striker => &[
                "Score Striker",
                "Score Nine",
                "Score Second Striker",
                "Score Striker Total",
            ],
        }
    }

    /// Raw facet metrics the producer ships for this group, used for the
    /// leaderboard detail columns. Suffix codes follow the upstream naming
    /// contract "<Metric> (<FACET_CODE>)".
    pub fn metric_columns(self) -> &'static [&'static str] {
        match self {
            RoleGroup::Goalkeeper => &[
                "Goals Prevented (GK_KEEPER)",
                "Cross Claim % (GK_KEEPER)",
                "Pass % (GK_KEEPER)",
                "Save % (GK_STOPPER)",
                "xG Faced per Goal (GK_STOPPER)",
                "Shots per Goal (GK_STOPPER)",
                "Pass % Own Half (GK_FEET)",
                "Ball Progression (GK_FEET)",
                "Losses (GK_FEET)",
            ],
            RoleGroup::FullBack => &[
                "Tackles per Dribbled Past (FB_GENERIC)",
                "Interceptions (FB_GENERIC)",
                "Recoveries (FB_GENERIC)",
                "Crosses Completed (FB_GENERIC)",
                "Tackle Success % (FB_DEFENSIVE)",
                "Aerial Duels Won (FB_DEFENSIVE)",
                "Crosses Blocked (FB_DEFENSIVE)",
                "Depth Runs (FB_OFFENSIVE)",
                "Expected Threat (FB_OFFENSIVE)",
                "Cross xA (FB_OFFENSIVE)",
            ],
            RoleGroup::CentreBack => &[
                "Defensive Duels Won % (CB_GENERIC)",
                "Interceptions (CB_GENERIC)",
                "Aerial Duels (CB_GENERIC)",
                "Clearances (CB_DEFENSIVE)",
                "Aerial Duels Won (CB_DEFENSIVE)",
                "Progressive Passes Completed (CB_BUILDUP)",
                "Pass xT (CB_BUILDUP)",
                "Carry Progress (CB_BUILDUP)",
            ],
            RoleGroup::Midfield => &[
                "Pass % (MC_GENERIC)",
                "Recoveries (MC_GENERIC)",
                "Ball Progression (MC_GENERIC)",
                "Defensive Duels (MC_HOLDING)",
                "Interceptions (MC_HOLDING)",
                "Ball Retention % (MC_HOLDING)",
                "Goal Contribution (MC_B2B)",
                "Depth Runs Final Third (MC_B2B)",
                "Open-Play xA (MC_ATTACKING)",
                "Shots (MC_ATTACKING)",
                "Box Entries (MC_ATTACKING)",
            ],
            RoleGroup::Winger => &[
                "Pressures (WG_GENERIC)",
                "Goal Contribution (WG_GENERIC)",
                "Expected Threat (WG_GENERIC)",
                "Dribbles Completed Final Third (WG_WIDE)",
                "Cross xA (WG_WIDE)",
                "Touches in Opposition Box (WG_ARRIVING)",
                "Non-Penalty Goals (WG_ARRIVING)",
                "Chances Created (WG_LINKUP)",
                "Pass xT per 100 Passes (WG_LINKUP)",
            ],
            RoleGroup::Striker => &[
                "Non-Penalty Goals (ST_STRIKER)",
                "Shots (ST_STRIKER)",
                "xG per Shot (ST_STRIKER)",
                "Aerial Duels Won % (ST_NINE)",
                "xG per 90 (ST_NINE)",
                "Long Passes Received (ST_NINE)",
                "Expected Assists (ST_SECOND)",
                "Progressive Carries (ST_SECOND)",
                "Carry and Shot (ST_SECOND)",
            ],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoleGroup::Goalkeeper => "Goalkeepers",
            RoleGroup::FullBack => "Full Backs",
            RoleGroup::CentreBack => "Centre Backs",
            RoleGroup::Midfield => "Midfielders",
            RoleGroup::Winger => "Wingers",
            RoleGroup::Striker => "Strikers",
        }
    }
}

/// On-field slots used for ranking and the pitch view. Several slots share one
/// percentile group (both centre-back slots, the midfield trio) but each slot
/// designates its own primary score column for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Goalkeeper,
    LeftBack,
    CentreBackLeft,
    CentreBackRight,
    RightBack,
    HoldingMid,
    BoxToBoxMid,
    AttackingMid,
    LeftWinger,
    RightWinger,
    Striker,
}

impl Slot {
    pub const ALL: [Slot; 11] = [
        Slot::Goalkeeper,
        Slot::LeftBack,
        Slot::CentreBackLeft,
        Slot::CentreBackRight,
        Slot::RightBack,
        Slot::HoldingMid,
        Slot::BoxToBoxMid,
        Slot::AttackingMid,
        Slot::LeftWinger,
        Slot::RightWinger,
        Slot::Striker,
    ];

    pub fn codes(self) -> &'static [&'static str] {
        match self {
            Slot::Goalkeeper => RoleGroup::Goalkeeper.codes(),
            Slot::LeftBack => &["LI", "CAI"],
            Slot::CentreBackLeft | Slot::CentreBackRight => RoleGroup::CentreBack.codes(),
            Slot::RightBack => &["LD", "CAD"],
            Slot::HoldingMid | Slot::BoxToBoxMid | Slot::AttackingMid => RoleGroup::Midfield.codes(),
            Slot::LeftWinger => &["EI", "MI"],
            Slot::RightWinger => &["ED", "MD"],
            Slot::Striker => RoleGroup::Striker.codes(),
        }
    }

    pub fn group(self) -> RoleGroup {
        match self {
            Slot::Goalkeeper => RoleGroup::Goalkeeper,
            Slot::LeftBack | Slot::RightBack => RoleGroup::FullBack,
            Slot::CentreBackLeft | Slot::CentreBackRight => RoleGroup::CentreBack,
            Slot::HoldingMid | Slot::BoxToBoxMid | Slot::AttackingMid => RoleGroup::Midfield,
            Slot::LeftWinger | Slot::RightWinger => RoleGroup::Winger,
            Slot::Striker => RoleGroup::Striker,
        }
    }

    pub fn primary_score(self) -> &'static str {
        match self {
            Slot::Goalkeeper => "Score GK Total",
            Slot::LeftBack | Slot::RightBack => "Score Full Back Total",
            Slot::CentreBackLeft | Slot::CentreBackRight => "Score Centre Back Total",
            Slot::HoldingMid => "Score Midfield Holding",
            Slot::BoxToBoxMid => "Score Midfield Box-to-Box",
            Slot::AttackingMid => "Score Midfield Attacking",
            Slot::LeftWinger | Slot::RightWinger => "Score Winger Total",
            Slot::Striker => "Score Nine",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::Goalkeeper => "Goalkeeper",
            Slot::LeftBack => "Left Back",
            Slot::CentreBackLeft => "Centre Back Left",
            Slot::CentreBackRight => "Centre Back Right",
            Slot::RightBack => "Right Back",
            Slot::HoldingMid => "Holding Mid",
            Slot::BoxToBoxMid => "Box-to-Box Mid",
            Slot::AttackingMid => "Attacking Mid",
            Slot::LeftWinger => "Left Winger",
            Slot::RightWinger => "Right Winger",
            Slot::Striker => "Striker",
        }
    }
}

/// Every composite score column across all groups. Built once; ingest uses it
/// to validate the producer's column contract.
pub static SCORE_CATALOG: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut cols = Vec::new();
    for group in RoleGroup::ALL {
        cols.extend_from_slice(group.score_columns());
    }
    cols
});

/// True when any token of the free-text position label equals, or starts
/// with, one of the codes. The label may pack several codes ("POR / DFC");
/// the prefix rule absorbs numbered variants like "POR1" or "GK2".
pub fn position_matches(label: Option<&str>, codes: &[&str]) -> bool {
    let Some(label) = label else {
        return false;
    };
    let mut text = label.to_uppercase();
    for sep in ['/', '-', ',', '|', ';'] {
        text = text.replace(sep, " ");
    }
    text.split_whitespace().any(|token| {
        codes
            .iter()
            .any(|code| token == *code || token.starts_with(code))
    })
}
