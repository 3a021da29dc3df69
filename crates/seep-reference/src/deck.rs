//! A keyword-scanning deck reader.
//!
//! Records every keyword it sees and reads the data of a handful of them:
//! `DIMENS`, `EQUIL`, `TSTEP`, `PRESSURE`, `SWAT`, `SGAS`, `RS`, and
//! `MESSAGES`. Input uses metric units: pressures in bar, depths in metres,
//! report steps in days.
//!
//! Data that cannot be read becomes an error [`DeckMessage`] carrying the
//! file and line, and the keyword's data is ignored. Loading only fails when
//! the file itself cannot be read.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use seep_core::{
    Deck, DeckMessage, EquilRecord, InitialStateRecords, MessageLimits, Phase, PhaseUsage,
    Severity, SimulationError, BARSA,
};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Keywords whose data is read; a second occurrence replaces the first.
const SINGLE_DATA_KEYWORDS: [&str; 7] =
    ["DIMENS", "EQUIL", "PRESSURE", "SWAT", "SGAS", "RS", "MESSAGES"];

// ── Scanning ───────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
struct Token {
    text: String,
    line: usize,
}

/// A keyword and the `/`-terminated records that follow it.
#[derive(Clone, Debug, Default)]
struct Section {
    name: String,
    line: usize,
    records: Vec<Vec<Token>>,
    open: Vec<Token>,
}

impl Section {
    fn new(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            line,
            ..Self::default()
        }
    }

    fn end_record(&mut self) {
        self.records.push(std::mem::take(&mut self.open));
    }

    fn close(&mut self) {
        if !self.open.is_empty() {
            self.end_record();
        }
    }

    /// Tokens of every record, in order.
    fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.records.iter().flatten()
    }
}

/// The keyword a line opens, if it opens one.
fn keyword_of(line: &str) -> Option<&str> {
    let word = line.split_whitespace().next()?;
    let mut chars = word.chars();
    let leading = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    let rest = chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
    (leading && rest && word.len() <= 8).then_some(word)
}

fn scan(text: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.split("--").next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        if let Some(name) = keyword_of(line) {
            if let Some(previous) = sections.last_mut() {
                previous.close();
            }
            sections.push(Section::new(name, line_no));
            continue;
        }
        let Some(section) = sections.last_mut() else {
            continue;
        };
        // Anything after the terminating slash is a comment.
        let (data, terminated) = match line.find('/') {
            Some(pos) => (&line[..pos], true),
            None => (line, false),
        };
        for word in data.split_whitespace() {
            section.open.push(Token {
                text: word.to_string(),
                line: line_no,
            });
        }
        if terminated {
            section.end_record();
        }
    }
    if let Some(last) = sections.last_mut() {
        last.close();
    }
    sections
}

/// Expand `n*value` repeats and `n*` defaults into one entry per item.
fn expand<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> Result<Vec<Option<f64>>, &'a Token> {
    let mut values = Vec::new();
    for token in tokens {
        match token.text.split_once('*') {
            Some((count, value)) => {
                let count: usize = count.parse().map_err(|_| token)?;
                let value = if value.is_empty() {
                    None
                } else {
                    Some(value.parse::<f64>().map_err(|_| token)?)
                };
                values.extend(std::iter::repeat_n(value, count));
            }
            None => values.push(Some(token.text.parse::<f64>().map_err(|_| token)?)),
        }
    }
    Ok(values)
}

// ── KeywordDeck ────────────────────────────────────────────────────

/// A deck read by scanning for keywords.
#[derive(Clone, Debug)]
pub struct KeywordDeck {
    source: PathBuf,
    keywords: BTreeSet<String>,
    messages: Vec<DeckMessage>,
    limits: MessageLimits,
    dims: Option<[usize; 3]>,
    phases: PhaseUsage,
    report_steps: Vec<f64>,
    equil: Vec<EquilRecord>,
    initial_state: Option<InitialStateRecords>,
}

impl KeywordDeck {
    /// Read and scan the deck at `path`.
    pub fn load(path: &Path) -> Result<Self, SimulationError> {
        let text = fs::read_to_string(path).map_err(|error| {
            SimulationError::collaborator(
                "deck",
                format!("cannot read {}: {error}", path.display()),
            )
        })?;
        Ok(Self::parse(&text, path))
    }

    /// Scan `text`; `source` names the file in messages.
    pub fn parse(text: &str, source: &Path) -> Self {
        let mut deck = Self {
            source: source.to_path_buf(),
            keywords: BTreeSet::new(),
            messages: Vec::new(),
            limits: MessageLimits::default(),
            dims: None,
            phases: PhaseUsage::new(&[]),
            report_steps: Vec::new(),
            equil: Vec::new(),
            initial_state: None,
        };
        for section in scan(text) {
            let repeated = !deck.keywords.insert(section.name.clone());
            if repeated && SINGLE_DATA_KEYWORDS.contains(&section.name.as_str()) {
                deck.message(
                    Severity::Warning,
                    section.line,
                    format!("{} appears more than once; the last occurrence wins", section.name),
                );
            }
            deck.read_section(&section);
        }
        let active: Vec<Phase> = Phase::ALL
            .into_iter()
            .filter(|phase| deck.keywords.contains(phase_keyword(*phase)))
            .collect();
        deck.phases = PhaseUsage::new(&active);
        tracing::debug!(
            keywords = deck.keywords.len(),
            messages = deck.messages.len(),
            "deck scanned"
        );
        deck
    }

    /// The file the deck was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Grid dimensions from `DIMENS`.
    pub fn dims(&self) -> Option<[usize; 3]> {
        self.dims
    }

    /// Phases enabled by the `WATER`, `OIL`, and `GAS` keywords.
    pub fn phase_usage(&self) -> &PhaseUsage {
        &self.phases
    }

    fn message(&mut self, severity: Severity, line: usize, text: String) {
        self.messages
            .push(DeckMessage::new(severity, text).at(self.source.clone(), line));
    }

    fn unreadable(&mut self, keyword: &str, token: &Token) {
        self.message(
            Severity::Error,
            token.line,
            format!("{keyword}: cannot read value '{}'", token.text),
        );
    }

    fn read_section(&mut self, section: &Section) {
        match section.name.as_str() {
            "DIMENS" => self.read_dimens(section),
            "EQUIL" => self.read_equil(section),
            "TSTEP" => self.read_tstep(section),
            "PRESSURE" => {
                if let Some(values) = self.read_values(section) {
                    let pressure = values.into_iter().map(|p| p.map(|bar| bar * BARSA)).collect();
                    self.initial_state_mut().pressure = Some(pressure);
                }
            }
            "SWAT" | "SGAS" | "RS" => {
                let Some(values) = self.read_complete(section) else {
                    return;
                };
                let records = self.initial_state_mut();
                match section.name.as_str() {
                    "SWAT" => records.water_saturation = Some(values),
                    "SGAS" => records.gas_saturation = Some(values),
                    _ => records.dissolved_gas_ratio = Some(values),
                }
            }
            "MESSAGES" => self.read_messages(section),
            _ => {}
        }
    }

    fn initial_state_mut(&mut self) -> &mut InitialStateRecords {
        self.initial_state.get_or_insert_with(InitialStateRecords::default)
    }

    fn read_values(&mut self, section: &Section) -> Option<Vec<Option<f64>>> {
        match expand(section.tokens()) {
            Ok(values) => Some(values),
            Err(token) => {
                self.unreadable(&section.name, token);
                None
            }
        }
    }

    /// Like `read_values`, but defaulted items are an error.
    fn read_complete(&mut self, section: &Section) -> Option<Vec<f64>> {
        let values = self.read_values(section)?;
        let complete: Option<Vec<f64>> = values.into_iter().collect();
        if complete.is_none() {
            self.message(
                Severity::Error,
                section.line,
                format!("{}: defaulted items are not supported", section.name),
            );
        }
        complete
    }

    fn read_dimens(&mut self, section: &Section) {
        let Some(values) = self.read_complete(section) else {
            return;
        };
        let dims: Vec<usize> = values
            .iter()
            .filter(|v| v.fract() == 0.0 && **v >= 1.0)
            .map(|v| *v as usize)
            .collect();
        match <[usize; 3]>::try_from(dims) {
            Ok(dims) if values.len() == 3 => self.dims = Some(dims),
            _ => self.message(
                Severity::Error,
                section.line,
                "DIMENS needs three positive integers".to_string(),
            ),
        }
    }

    fn read_equil(&mut self, section: &Section) {
        self.equil.clear();
        for record in section.records.iter().filter(|r| !r.is_empty()) {
            let values = match expand(record) {
                Ok(values) => values,
                Err(token) => {
                    self.unreadable("EQUIL", token);
                    continue;
                }
            };
            let item = |i: usize| values.get(i).copied().flatten();
            let (Some(datum_depth), Some(datum_pressure)) = (item(0), item(1)) else {
                self.message(
                    Severity::Error,
                    record[0].line,
                    "EQUIL record needs a datum depth and pressure".to_string(),
                );
                continue;
            };
            self.equil.push(EquilRecord {
                datum_depth,
                datum_pressure: datum_pressure * BARSA,
                water_oil_contact: item(2).unwrap_or(datum_depth),
                water_oil_pc: item(3).unwrap_or(0.0) * BARSA,
                gas_oil_contact: item(4).unwrap_or(datum_depth),
                gas_oil_pc: item(5).unwrap_or(0.0) * BARSA,
            });
        }
    }

    /// `TSTEP` may appear several times; the steps accumulate.
    fn read_tstep(&mut self, section: &Section) {
        if let Some(days) = self.read_complete(section) {
            self.report_steps
                .extend(days.into_iter().map(|d| d * SECONDS_PER_DAY));
        }
    }

    /// Items in order: messages, comments, warnings, problems, errors, bugs.
    fn read_messages(&mut self, section: &Section) {
        let Some(values) = self.read_values(section) else {
            return;
        };
        let mut limits = MessageLimits::default();
        let slots = [
            &mut limits.info,
            &mut limits.note,
            &mut limits.warning,
            &mut limits.problem,
            &mut limits.error,
            &mut limits.bug,
        ];
        for (slot, value) in slots.into_iter().zip(values) {
            if let Some(v) = value.filter(|v| *v >= 0.0 && v.fract() == 0.0) {
                *slot = v as usize;
            }
        }
        self.limits = limits;
    }
}

fn phase_keyword(phase: Phase) -> &'static str {
    match phase {
        Phase::Water => "WATER",
        Phase::Oil => "OIL",
        Phase::Gas => "GAS",
    }
}

impl Deck for KeywordDeck {
    fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }

    fn messages(&self) -> &[DeckMessage] {
        &self.messages
    }

    fn message_limits(&self) -> MessageLimits {
        self.limits
    }

    fn report_steps(&self) -> &[f64] {
        &self.report_steps
    }

    fn equilibration_records(&self) -> &[EquilRecord] {
        &self.equil
    }

    fn initial_state(&self) -> Option<&InitialStateRecords> {
        self.initial_state.as_ref()
    }
}
