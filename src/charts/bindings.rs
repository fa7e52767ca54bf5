//! Chart Bindings Module
//! Explicit mapping from filter inputs to handlers and output charts.

use crate::data::{DatasetId, MovementColumns};
use crate::stats::{AggregateSpec, Aggregation, RowOrder};
use serde::Serialize;

pub const SOURCE_RAIS: &str = "Fonte: RAIS Estabelecimentos";
pub const SOURCE_CAGED: &str = "Fonte: CAGED e NOVO CAGED";
pub const SOURCE_IBGE: &str = "Fonte: IBGE";

/// How the charting layer should draw a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    GroupedBar,
    Line,
    Area,
}

/// Order of dropdown options after the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionOrder {
    Ascending,
    Descending,
}

/// Computation that produces a chart's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartHandler {
    Aggregate(AggregateSpec),
    /// Optional categorical filter, then admissions/separations reshaping.
    AdmissionsSeparations {
        filter_column: String,
        columns: MovementColumns,
    },
    /// Whole table, ordered; no filter input.
    Snapshot { sort_by: Vec<String> },
}

impl ChartHandler {
    pub fn filter_column(&self) -> Option<&str> {
        match self {
            ChartHandler::Aggregate(spec) => spec.filter_column.as_deref(),
            ChartHandler::AdmissionsSeparations { filter_column, .. } => {
                Some(filter_column.as_str())
            }
            ChartHandler::Snapshot { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartBinding {
    pub output_id: &'static str,
    pub input_id: Option<&'static str>,
    pub title: &'static str,
    pub dataset: DatasetId,
    pub kind: ChartKind,
    pub source: &'static str,
    pub option_order: OptionOrder,
    pub handler: ChartHandler,
}

/// The dashboard's charts.
pub fn default_bindings() -> Vec<ChartBinding> {
    let by_sector = |group: &[&str], measure: &str, aggregation| {
        AggregateSpec::new(group, measure, aggregation).filtered_by("cnae_2_descricao_secao")
    };

    vec![
        ChartBinding {
            output_id: "fig-rais-anual",
            input_id: Some("filtro-cnae-rais-saldo"),
            title: "Estoque de postos de trabalho por ano",
            dataset: DatasetId::RaisAnual,
            kind: ChartKind::Area,
            source: SOURCE_RAIS,
            option_order: OptionOrder::Ascending,
            handler: ChartHandler::Aggregate(
                AggregateSpec::new(&["ano"], "quantidade_vinculos_ativos", Aggregation::Sum)
                    .filtered_by("descricao_secao_cnae"),
            ),
        },
        ChartBinding {
            output_id: "fig-saldo-anual",
            input_id: Some("filtro-cnae-caged-saldo"),
            title: "Saldo de movimentações por ano",
            dataset: DatasetId::CagedSaldoAnual,
            kind: ChartKind::Bar,
            source: SOURCE_CAGED,
            option_order: OptionOrder::Ascending,
            handler: ChartHandler::Aggregate(by_sector(
                &["ano"],
                "saldo_movimentacao",
                Aggregation::Sum,
            )),
        },
        ChartBinding {
            output_id: "fig-caged-saldo-secao",
            input_id: Some("filtro-ano-caged-secao"),
            title: "Saldo de postos de trabalho por Seção da CNAE",
            dataset: DatasetId::CagedSaldoSecao,
            kind: ChartKind::HorizontalBar,
            source: SOURCE_CAGED,
            option_order: OptionOrder::Descending,
            handler: ChartHandler::Aggregate(
                AggregateSpec::new(
                    &["cnae_2_descricao_secao"],
                    "saldo_movimentacao",
                    Aggregation::Sum,
                )
                .filtered_by("ano")
                .ordered(RowOrder::ByMeasure),
            ),
        },
        ChartBinding {
            output_id: "fig-caged-saldo-idade",
            input_id: Some("filtro-ano-caged-idade"),
            title: "Saldo de postos de trabalho por idade",
            dataset: DatasetId::CagedSaldoIdade,
            kind: ChartKind::HorizontalBar,
            source: SOURCE_CAGED,
            option_order: OptionOrder::Descending,
            handler: ChartHandler::Aggregate(
                AggregateSpec::new(&["idade"], "saldo_movimentacao", Aggregation::Sum)
                    .filtered_by("ano")
                    .ordered(RowOrder::ByMeasure),
            ),
        },
        ChartBinding {
            output_id: "fig-caged-salario-medio",
            input_id: Some("filtro-ano-caged-salario-medio"),
            title: "Evolução da média salarial de admissões e demissões",
            dataset: DatasetId::CagedMediaSalario,
            kind: ChartKind::Line,
            source: SOURCE_CAGED,
            option_order: OptionOrder::Ascending,
            handler: ChartHandler::Aggregate(by_sector(
                &["ano", "variable"],
                "salario_medio",
                Aggregation::Mean,
            )),
        },
        ChartBinding {
            output_id: "fig-caged-media-idade",
            input_id: Some("filtro-ano-caged-media-idade"),
            title: "Evolução da média de idade das admissões e demissões",
            dataset: DatasetId::CagedMediaIdade,
            kind: ChartKind::Line,
            source: SOURCE_CAGED,
            option_order: OptionOrder::Ascending,
            handler: ChartHandler::Aggregate(by_sector(
                &["ano", "variable"],
                "media_idade",
                Aggregation::Mean,
            )),
        },
        ChartBinding {
            output_id: "fig-admissoes-desligamentos",
            input_id: Some("filtro-cnae-caged-movimentacao"),
            title: "Admissões e desligamentos por mês",
            dataset: DatasetId::CagedMovimentacao,
            kind: ChartKind::GroupedBar,
            source: SOURCE_CAGED,
            option_order: OptionOrder::Ascending,
            handler: ChartHandler::AdmissionsSeparations {
                filter_column: "cnae_2_descricao_secao".to_string(),
                columns: MovementColumns::default(),
            },
        },
        ChartBinding {
            output_id: "fig-pib-categorias",
            input_id: None,
            title: "Evolução do PIB de Osasco por categoria",
            dataset: DatasetId::PibPorCategoria,
            kind: ChartKind::Line,
            source: SOURCE_IBGE,
            option_order: OptionOrder::Ascending,
            handler: ChartHandler::Snapshot {
                sort_by: vec!["ano".to_string(), "variavel_dash".to_string()],
            },
        },
        ChartBinding {
            output_id: "fig-pib-per-capita",
            input_id: None,
            title: "Evolução do PIB per capita de Osasco",
            dataset: DatasetId::PibPerCapita,
            kind: ChartKind::Area,
            source: SOURCE_IBGE,
            option_order: OptionOrder::Ascending,
            handler: ChartHandler::Snapshot {
                sort_by: vec!["ano".to_string()],
            },
        },
        ChartBinding {
            output_id: "fig-pib-sp",
            input_id: None,
            title: "Evolução do PIB de Osasco no Estado de São Paulo",
            dataset: DatasetId::PibParticipacaoSp,
            kind: ChartKind::Area,
            source: SOURCE_IBGE,
            option_order: OptionOrder::Ascending,
            handler: ChartHandler::Snapshot {
                sort_by: vec!["ano".to_string()],
            },
        },
    ]
}
