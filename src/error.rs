use thiserror::Error;

// ---------------------------------------------------------------------------
// ExtractError – why an extraction produced no analysis
// ---------------------------------------------------------------------------

/// Outcomes that stop an extraction.
///
/// Short rows and unparsable numbers are not here: they are absorbed by the
/// parser (dropped row, value 0) and never surface.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Nothing was pasted (neither HTML nor plain text).
    #[error("no content to analyze")]
    NoContent,

    /// A reference date is required before extracting.
    #[error("no reference date selected")]
    MissingDate,

    /// No table whose header row starts with the sector marker.
    #[error("no table with a \"Setor\" header row was found")]
    NotFound,

    /// The table was found but every data row was a summary or too short.
    #[error("table found but it contains no sector rows")]
    Empty,

    /// The markup tokenizer gave up on the input.
    #[error("failed to read pasted markup: {0}")]
    Markup(#[from] quick_xml::Error),

    #[error("failed to decode pasted markup: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
}

impl ExtractError {
    /// One sentence suitable for the status line of the UI.
    pub fn status_message(&self) -> &'static str {
        match self {
            ExtractError::NoContent => "Nenhum dado válido foi colado. Cole a tabela primeiro.",
            ExtractError::MissingDate => "Por favor, selecione a Data de Referência.",
            ExtractError::NotFound => "Tabela não encontrada. Copie a tabela que começa com a coluna \"Setor\".",
            ExtractError::Empty => "Tabela encontrada, mas sem dados válidos.",
            ExtractError::Markup(_) | ExtractError::Encoding(_) => "Erro ao processar dados.",
        }
    }

    /// Whether this is the unexpected-failure path rather than a user mistake.
    pub fn is_internal(&self) -> bool {
        matches!(self, ExtractError::Markup(_) | ExtractError::Encoding(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_and_empty_are_reported_differently() {
        assert_ne!(
            ExtractError::NotFound.status_message(),
            ExtractError::Empty.status_message()
        );
        assert!(!ExtractError::NotFound.is_internal());
        assert!(!ExtractError::Empty.is_internal());
    }
}
