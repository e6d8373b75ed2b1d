// src/decode/column.rs

/// Number of logical column slots per row: `G0..G10` followed by `M0..M3`.
pub const SLOT_COUNT: usize = 15;

/// One logical column of the production query, in mask-bit order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    /// G0 `Datas.Data`
    Date,
    /// G1 `Instalação`
    Installation,
    /// G2 `Operadora`
    Operator,
    /// G3 `Tipo`
    Kind,
    /// G4 `Estado`
    Estado,
    /// G5 `Cidade`
    City,
    /// G6 `Atendimento Campo`
    AtendimentoCampo,
    /// G7 `Campo`
    Campo,
    /// G8 `IND_ATIVO`, decoded but not exported
    Active,
    /// G9 `Silga`
    Code,
    /// G10 `Situação`
    Status,
    /// M0 `Petróleo`
    OilProduction,
    /// M1 `Gás Mm3`
    GasProduction,
    /// M2 `Sum(qtde_pms)`
    Quantity,
    /// M3 `Petróleo Equivalente boe`
    OilEquivalentsBoe,
}

/// How a raw sparse value is turned into a cell for a given slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPolicy {
    /// Epoch seconds or milliseconds rendered as `YYYY-MM-DD`.
    Timestamp,
    /// Ordinal index into `ValueDicts.D{n}`.
    Dictionary(usize),
    Passthrough,
}

impl Column {
    /// Slots in bit order: bit `i` of `R`/`Ø` belongs to `ALL[i]`.
    pub const ALL: [Column; SLOT_COUNT] = [
        Column::Date,
        Column::Installation,
        Column::Operator,
        Column::Kind,
        Column::Estado,
        Column::City,
        Column::AtendimentoCampo,
        Column::Campo,
        Column::Active,
        Column::Code,
        Column::Status,
        Column::OilProduction,
        Column::GasProduction,
        Column::Quantity,
        Column::OilEquivalentsBoe,
    ];

    pub fn slot(self) -> usize {
        self as usize
    }

    /// Fixed slot policy table. `G1..G10` read `D0..D9` in that order.
    pub fn policy(self) -> SlotPolicy {
        match self {
            Column::Date => SlotPolicy::Timestamp,
            Column::Installation
            | Column::Operator
            | Column::Kind
            | Column::Estado
            | Column::City
            | Column::AtendimentoCampo
            | Column::Campo
            | Column::Active
            | Column::Code
            | Column::Status => SlotPolicy::Dictionary(self.slot() - 1),
            Column::OilProduction
            | Column::GasProduction
            | Column::Quantity
            | Column::OilEquivalentsBoe => SlotPolicy::Passthrough,
        }
    }
}
