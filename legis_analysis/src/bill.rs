// ********* Bill identifiers and lookup tables ***********

use std::fmt::Display;
use std::str::FromStr;

/// One of the two chambers of Congress.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Chamber {
    House,
    Senate,
}

impl Chamber {
    pub const ALL: [Chamber; 2] = [Chamber::House, Chamber::Senate];

    /// The single-letter code used in file names ('h' or 's').
    pub fn code(&self) -> &'static str {
        match self {
            Chamber::House => "h",
            Chamber::Senate => "s",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Chamber::House => "House",
            Chamber::Senate => "Senate",
        }
    }

    /// The chamber of a legislator term type ("rep" or "sen").
    pub fn from_term_type(term_type: &str) -> Option<Chamber> {
        match term_type {
            "rep" => Some(Chamber::House),
            "sen" => Some(Chamber::Senate),
            _ => None,
        }
    }
}

/// Bills are compared only against bills with the same noun.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum BillNoun {
    Bill,
    Resolution,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum BillType {
    HouseResolution,
    SenateBill,
    HouseBill,
    SenateResolution,
    HouseConcurrentResolution,
    SenateConcurrentResolution,
    HouseJointResolution,
    SenateJointResolution,
}

struct BillTypeInfo {
    value: u32,
    label: &'static str,
    slug: &'static str,
    chamber: Chamber,
}

const BILL_TYPES: [(BillType, BillTypeInfo); 8] = [
    (
        BillType::HouseResolution,
        BillTypeInfo {
            value: 1,
            label: "H.Res.",
            slug: "hres",
            chamber: Chamber::House,
        },
    ),
    (
        BillType::SenateBill,
        BillTypeInfo {
            value: 2,
            label: "S.",
            slug: "s",
            chamber: Chamber::Senate,
        },
    ),
    (
        BillType::HouseBill,
        BillTypeInfo {
            value: 3,
            label: "H.R.",
            slug: "hr",
            chamber: Chamber::House,
        },
    ),
    (
        BillType::SenateResolution,
        BillTypeInfo {
            value: 4,
            label: "S.Res.",
            slug: "sres",
            chamber: Chamber::Senate,
        },
    ),
    (
        BillType::HouseConcurrentResolution,
        BillTypeInfo {
            value: 5,
            label: "H.Con.Res.",
            slug: "hconres",
            chamber: Chamber::House,
        },
    ),
    (
        BillType::SenateConcurrentResolution,
        BillTypeInfo {
            value: 6,
            label: "S.Con.Res.",
            slug: "sconres",
            chamber: Chamber::Senate,
        },
    ),
    (
        BillType::HouseJointResolution,
        BillTypeInfo {
            value: 7,
            label: "H.J.Res.",
            slug: "hjres",
            chamber: Chamber::House,
        },
    ),
    (
        BillType::SenateJointResolution,
        BillTypeInfo {
            value: 8,
            label: "S.J.Res.",
            slug: "sjres",
            chamber: Chamber::Senate,
        },
    ),
];

impl BillType {
    /// The bill types that can carry text into law and take part in the text comparison.
    pub const LAWMAKING: [BillType; 4] = [
        BillType::HouseBill,
        BillType::SenateBill,
        BillType::HouseJointResolution,
        BillType::SenateJointResolution,
    ];

    pub fn all() -> impl Iterator<Item = BillType> {
        BILL_TYPES.iter().map(|(bt, _)| *bt)
    }

    fn info(&self) -> &'static BillTypeInfo {
        // The table covers every variant.
        &BILL_TYPES[BILL_TYPES
            .iter()
            .position(|(bt, _)| bt == self)
            .unwrap_or_default()]
        .1
    }

    pub fn value(&self) -> u32 {
        self.info().value
    }

    pub fn label(&self) -> &'static str {
        self.info().label
    }

    pub fn slug(&self) -> &'static str {
        self.info().slug
    }

    pub fn chamber(&self) -> Chamber {
        self.info().chamber
    }

    pub fn noun(&self) -> BillNoun {
        match self {
            BillType::HouseBill | BillType::SenateBill => BillNoun::Bill,
            _ => BillNoun::Resolution,
        }
    }

    pub fn from_slug(slug: &str) -> Option<BillType> {
        BILL_TYPES
            .iter()
            .find(|(_, info)| info.slug == slug)
            .map(|(bt, _)| *bt)
    }
}

/// The status codes found in the bill metadata.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum BillStatus {
    Introduced,
    Referred,
    Reported,
    PassOverHouse,
    PassOverSenate,
    PassedSimpleRes,
    PassedConstAmend,
    PassedConcurrentRes,
    PassedBill,
    PassBackHouse,
    PassBackSenate,
    ProvKillSuspensionFailed,
    ProvKillClotureFailed,
    ProvKillPingPongFail,
    ProvKillVeto,
    FailOriginatingHouse,
    FailOriginatingSenate,
    FailSecondHouse,
    FailSecondSenate,
    VetoedOverridePassOverHouse,
    VetoedOverridePassOverSenate,
    VetoedPocket,
    VetoedOverrideFailOriginatingHouse,
    VetoedOverrideFailOriginatingSenate,
    VetoedOverrideFailSecondHouse,
    VetoedOverrideFailSecondSenate,
    EnactedSigned,
    EnactedVetoOverride,
    EnactedTenDayRule,
}

// (status, value, label, code)
const BILL_STATUSES: [(BillStatus, u32, &str, &str); 29] = [
    (BillStatus::Introduced, 1, "Introduced", "INTRODUCED"),
    (BillStatus::Referred, 2, "Referred to Committee", "REFERRED"),
    (BillStatus::Reported, 3, "Reported by Committee", "REPORTED"),
    (BillStatus::PassOverHouse, 4, "Passed House", "PASS_OVER:HOUSE"),
    (BillStatus::PassOverSenate, 5, "Passed Senate", "PASS_OVER:SENATE"),
    (BillStatus::PassedSimpleRes, 6, "Resolution Passed", "PASSED:SIMPLERES"),
    (BillStatus::PassedConstAmend, 7, "Resolution Passed", "PASSED:CONSTAMEND"),
    (
        BillStatus::PassedConcurrentRes,
        8,
        "Resolution Passed",
        "PASSED:CONCURRENTRES",
    ),
    (BillStatus::PassedBill, 9, "Passed Congress", "PASSED:BILL"),
    (
        BillStatus::PassBackHouse,
        10,
        "Passed House with Changes",
        "PASS_BACK:HOUSE",
    ),
    (
        BillStatus::PassBackSenate,
        11,
        "Passed Senate with Changes",
        "PASS_BACK:SENATE",
    ),
    (
        BillStatus::ProvKillSuspensionFailed,
        12,
        "Failed Under Suspension",
        "PROV_KILL:SUSPENSIONFAILED",
    ),
    (
        BillStatus::ProvKillClotureFailed,
        13,
        "Failed Cloture",
        "PROV_KILL:CLOTUREFAILED",
    ),
    (
        BillStatus::ProvKillPingPongFail,
        14,
        "Failed to Resolve Differences",
        "PROV_KILL:PINGPONGFAIL",
    ),
    (BillStatus::ProvKillVeto, 15, "Vetoed", "PROV_KILL:VETO"),
    (
        BillStatus::FailOriginatingHouse,
        16,
        "Failed House",
        "FAIL:ORIGINATING:HOUSE",
    ),
    (
        BillStatus::FailOriginatingSenate,
        17,
        "Failed Senate",
        "FAIL:ORIGINATING:SENATE",
    ),
    (BillStatus::FailSecondHouse, 19, "Failed House", "FAIL:SECOND:HOUSE"),
    (
        BillStatus::FailSecondSenate,
        20,
        "Failed Senate",
        "FAIL:SECOND:SENATE",
    ),
    (
        BillStatus::VetoedOverridePassOverHouse,
        21,
        "House Overrides Veto",
        "VETOED:OVERRIDE_PASS_OVER:HOUSE",
    ),
    (
        BillStatus::VetoedOverridePassOverSenate,
        22,
        "Senate Overrides Veto",
        "VETOED:OVERRIDE_PASS_OVER:SENATE",
    ),
    (BillStatus::VetoedPocket, 23, "Pocket Vetoed", "VETOED:POCKET"),
    (
        BillStatus::VetoedOverrideFailOriginatingHouse,
        24,
        "Veto Override Failed in House",
        "VETOED:OVERRIDE_FAIL_ORIGINATING:HOUSE",
    ),
    (
        BillStatus::VetoedOverrideFailOriginatingSenate,
        25,
        "Veto Override Failed in Senate",
        "VETOED:OVERRIDE_FAIL_ORIGINATING:SENATE",
    ),
    (
        BillStatus::VetoedOverrideFailSecondHouse,
        26,
        "Veto Override Failed in House",
        "VETOED:OVERRIDE_FAIL_SECOND:HOUSE",
    ),
    (
        BillStatus::VetoedOverrideFailSecondSenate,
        27,
        "Veto Override Failed in Senate",
        "VETOED:OVERRIDE_FAIL_SECOND:SENATE",
    ),
    (
        BillStatus::EnactedSigned,
        28,
        "Signed by the President",
        "ENACTED:SIGNED",
    ),
    (
        BillStatus::EnactedVetoOverride,
        29,
        "Veto Overridden",
        "ENACTED:VETO_OVERRIDE",
    ),
    (
        BillStatus::EnactedTenDayRule,
        32,
        "Enacted Without Signature",
        "ENACTED:TENDAYRULE",
    ),
];

impl BillStatus {
    fn entry(&self) -> &'static (BillStatus, u32, &'static str, &'static str) {
        // The table covers every variant.
        &BILL_STATUSES[BILL_STATUSES
            .iter()
            .position(|(s, _, _, _)| s == self)
            .unwrap_or_default()]
    }

    pub fn value(&self) -> u32 {
        self.entry().1
    }

    pub fn label(&self) -> &'static str {
        self.entry().2
    }

    pub fn code(&self) -> &'static str {
        self.entry().3
    }

    pub fn from_code(code: &str) -> Option<BillStatus> {
        BILL_STATUSES
            .iter()
            .find(|(_, _, _, c)| *c == code)
            .map(|(s, _, _, _)| *s)
    }

    pub fn is_enacted(&self) -> bool {
        matches!(
            self,
            BillStatus::EnactedSigned
                | BillStatus::EnactedVetoOverride
                | BillStatus::EnactedTenDayRule
        )
    }
}

/// A bill, identified by its type, number and Congress.
///
/// The textual form is `{slug}{number}-{congress}`, for example `hr3590-111`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct BillId {
    pub bill_type: BillType,
    pub number: u32,
    pub congress: u32,
}

impl BillId {
    pub fn new(bill_type: BillType, number: u32, congress: u32) -> BillId {
        BillId {
            bill_type,
            number,
            congress,
        }
    }

    /// The directory name of the bill in the congress data layout, e.g. `hr3590`.
    pub fn slug(&self) -> String {
        format!("{}{}", self.bill_type.slug(), self.number)
    }

    /// A human readable form such as `H.R. 3590 (111th)`.
    pub fn display_number(&self) -> String {
        format!(
            "{} {} ({}{})",
            self.bill_type.label(),
            self.number,
            self.congress,
            ordinal_suffix(self.congress)
        )
    }
}

fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

impl Display for BillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}-{}",
            self.bill_type.slug(),
            self.number,
            self.congress
        )
    }
}

impl Ord for BillId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.congress, self.bill_type, self.number).cmp(&(
            other.congress,
            other.bill_type,
            other.number,
        ))
    }
}

impl PartialOrd for BillId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InvalidBillId {
    pub id: String,
}

impl std::error::Error for InvalidBillId {}

impl Display for InvalidBillId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "not a bill identifier: {:?}", self.id)
    }
}

impl FromStr for BillId {
    type Err = InvalidBillId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidBillId { id: s.to_string() };
        let (head, congress) = s.rsplit_once('-').ok_or_else(err)?;
        let congress = congress.parse::<u32>().map_err(|_| err())?;
        let split = head.find(|c: char| c.is_ascii_digit()).ok_or_else(err)?;
        let (slug, number) = head.split_at(split);
        let bill_type = BillType::from_slug(slug).ok_or_else(err)?;
        let number = number.parse::<u32>().map_err(|_| err())?;
        Ok(BillId::new(bill_type, number, congress))
    }
}

// (code, name)
const TEXT_VERSIONS: [(&str, &str); 67] = [
    ("ah", "Amendment"),
    ("ah2", "Amendment"),
    ("as", "Amendment"),
    ("as2", "Amendment"),
    ("ash", "Additional Sponsors"),
    ("sas", "Additional Sponsors"),
    ("sc", "Sponsor Change"),
    ("ath", "Resolution Agreed to"),
    ("ats", "Resolution Agreed to"),
    ("cdh", "Committee Discharged"),
    ("cds", "Committee Discharged"),
    ("cph", "Considered and Passed by the House"),
    ("cps", "Considered and Passed by the Senate"),
    ("eah", "Passed the House (Engrossed) with an Amendment"),
    ("eas", "Passed the Senate (Engrossed) with an Amendment"),
    ("eh", "Passed the House (Engrossed)"),
    ("ehr", "Passed the House (Engrossed)/Reprint"),
    ("eh_s", "Passed the House (Engrossed)/Star Print"),
    ("enr", "Passed Congress/Enrolled Bill"),
    ("renr", "Passed Congress/Re-enrolled"),
    ("es", "Passed the Senate (Engrossed)"),
    ("esr", "Passed the Senate (Engrossed)/Reprint"),
    ("es_s", "Passed the Senate (Engrossed)/Star Print"),
    ("fah", "Failed Amendment"),
    ("fps", "Failed Passage"),
    ("hdh", "Held at Desk in the House"),
    ("hds", "Held at Desk in the Senate"),
    ("ih", "Introduced"),
    ("ihr", "Introduced/Reprint"),
    ("ih_s", "Introduced/Star Print"),
    ("is", "Introduced"),
    ("isr", "Introduced/Reprint"),
    ("is_s", "Introduced/Star Print"),
    ("iph", "Indefinitely Postponed in the House"),
    ("ips", "Indefinitely Postponed in the Senate"),
    ("lth", "Laid on Table in the House"),
    ("lts", "Laid on Table in the Senate"),
    ("oph", "Ordered to be Printed"),
    ("ops", "Ordered to be Printed"),
    ("pch", "Placed on Calendar in the House"),
    ("pcs", "Placed on Calendar in the Senate"),
    ("pp", "Public Print"),
    ("rah", "Referred to House Committee (w/ Amendments)"),
    ("ras", "Referred to Senate Committee (w/ Amendments)"),
    ("rch", "Reference Change"),
    ("rcs", "Reference Change"),
    ("rdh", "Received by the House"),
    ("rds", "Received by the Senate"),
    ("reah", "Passed the House (Re-Engrossed) with an Amendment"),
    ("re", "Reprint of an Amendment"),
    ("res", "Passed the Senate (Re-Engrossed) with an Amendment"),
    ("rfh", "Referred to House Committee"),
    ("rfhr", "Referred to House Committee/Reprint"),
    ("rfh_s", "Referred to House Committee/Star Print"),
    ("rfs", "Referred to Senate Committee"),
    ("rfsr", "Referred to Senate Committee/Reprint"),
    ("rfs_s", "Referred to Senate Committee/Star Print"),
    ("rh", "Reported by House Committee"),
    ("rhr", "Reported by House Committee/Reprint"),
    ("rh_s", "Reported by House Committee/Star Print"),
    ("rs", "Reported by Senate Committee"),
    ("rsr", "Reported by Senate Committee/Reprint"),
    ("rs_s", "Reported by Senate Committee/Star Print"),
    ("rih", "Referral Instructions in the House"),
    ("ris", "Referral Instructions in the Senate"),
    ("rth", "Referred to House Committee"),
    ("rts", "Referred to Senate Committee"),
];

/// The display name of a text version code (`ih`, `enr`, ...).
pub fn text_version_name(code: &str) -> Option<&'static str> {
    TEXT_VERSIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}
