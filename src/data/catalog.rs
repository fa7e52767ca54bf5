//! Dataset catalog - the snapshot files the dashboard reads at startup.

use crate::data::loader::{ColumnType, DataLoader, TextEncoding};
use ColumnType::{Float, Int, Text};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetId {
    RaisAnual,
    CagedSaldoAnual,
    CagedSaldoSecao,
    CagedSaldoIdade,
    CagedMediaIdade,
    CagedMediaSalario,
    CagedMovimentacao,
    PibPorCategoria,
    PibParticipacaoSp,
    PibPerCapita,
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetId::RaisAnual => "rais_anual",
            DatasetId::CagedSaldoAnual => "caged_saldo_anual",
            DatasetId::CagedSaldoSecao => "caged_saldo_secao",
            DatasetId::CagedSaldoIdade => "caged_saldo_idade",
            DatasetId::CagedMediaIdade => "caged_media_idade",
            DatasetId::CagedMediaSalario => "caged_media_salario",
            DatasetId::CagedMovimentacao => "caged_movimentacao",
            DatasetId::PibPorCategoria => "pib_por_categoria",
            DatasetId::PibParticipacaoSp => "pib_participacao_sp",
            DatasetId::PibPerCapita => "pib_per_capita",
        };
        f.write_str(name)
    }
}

/// One snapshot file and how to read it.
#[derive(Debug, Clone)]
pub struct DatasetSpec {
    pub id: DatasetId,
    pub file_name: &'static str,
    pub separator: u8,
    pub encoding: TextEncoding,
    pub columns: &'static [(&'static str, ColumnType)],
}

impl DatasetSpec {
    pub fn loader(&self) -> DataLoader {
        self.columns.iter().fold(
            DataLoader::new()
                .with_separator(self.separator)
                .with_encoding(self.encoding),
            |loader, (name, column_type)| loader.with_dtype(name, *column_type),
        )
    }
}

const fn latin1(
    id: DatasetId,
    file_name: &'static str,
    columns: &'static [(&'static str, ColumnType)],
) -> DatasetSpec {
    DatasetSpec {
        id,
        file_name,
        separator: b';',
        encoding: TextEncoding::Latin1,
        columns,
    }
}

/// RAIS exports are UTF-8; everything else comes out of the
/// Latin-1 pipeline.
pub const CATALOG: &[DatasetSpec] = &[
    DatasetSpec {
        id: DatasetId::RaisAnual,
        file_name: "rais_anual.csv",
        separator: b';',
        encoding: TextEncoding::Utf8,
        columns: &[
            ("ano", Int),
            ("descricao_secao_cnae", Text),
            ("quantidade_vinculos_ativos", Int),
            ("quantidade_vinculos_clt", Int),
            ("quantidade_vinculos_estatutarios", Int),
        ],
    },
    latin1(
        DatasetId::CagedSaldoAnual,
        "caged_saldo_movimentacao_anual.csv",
        &[
            ("ano", Int),
            ("cnae_2_descricao_secao", Text),
            ("saldo_movimentacao", Int),
        ],
    ),
    latin1(
        DatasetId::CagedSaldoSecao,
        "caged_saldo_secao.csv",
        &[
            ("ano", Int),
            ("cnae_2_descricao_secao", Text),
            ("saldo_movimentacao", Int),
        ],
    ),
    latin1(
        DatasetId::CagedSaldoIdade,
        "caged_saldo_idade.csv",
        &[("ano", Int), ("idade", Int), ("saldo_movimentacao", Int)],
    ),
    latin1(
        DatasetId::CagedMediaIdade,
        "caged_media_idade.csv",
        &[
            ("ano", Int),
            ("cnae_2_descricao_secao", Text),
            ("variable", Text),
            ("media_idade", Float),
        ],
    ),
    latin1(
        DatasetId::CagedMediaSalario,
        "caged_media_salario.csv",
        &[
            ("ano", Int),
            ("cnae_2_descricao_secao", Text),
            ("variable", Text),
            ("salario_medio", Float),
        ],
    ),
    latin1(
        DatasetId::CagedMovimentacao,
        "caged_movimentacao.csv",
        &[
            ("ano", Int),
            ("mes", Int),
            ("saldomovimentacao", Int),
            ("cnae_2_descricao_secao", Text),
        ],
    ),
    latin1(
        DatasetId::PibPorCategoria,
        "pib_por_categoria.csv",
        &[
            ("ano", Int),
            ("variavel_dash", Text),
            ("pib_deflacionado", Float),
        ],
    ),
    latin1(
        DatasetId::PibParticipacaoSp,
        "pib_participacao_sp.csv",
        &[("ano", Int), ("participacao_pib_sp", Float)],
    ),
    latin1(
        DatasetId::PibPerCapita,
        "pib_per_capita.csv",
        &[("ano", Int), ("pib_per_capita", Float)],
    ),
];
