use crate::models::{AnalysisResult, CaseInput, Section};

/// System prompt for providers that take one (non-negotiable constraints)
pub const SYSTEM_PROMPT: &str = r#"Você é um advogado brasileiro experiente que redige peças processuais.

REGRAS:
1. Use linguagem jurídica formal e técnica, em português do Brasil.
2. Não invente fatos que não foram informados.
3. Não inclua CSS, estilos inline, scripts ou blocos de código.
4. Quando for solicitado JSON, responda APENAS com o objeto JSON, sem comentários."#;

/// Stage 1: structured analysis of the case
pub fn build_analysis_prompt(case: &CaseInput) -> String {
    let mut prompt = String::new();

    prompt.push_str("Analise o seguinte caso jurídico e forneça uma análise estruturada em formato JSON.\n\n");
    push_case_fields(&mut prompt, case);

    prompt.push_str("Forneça a análise no seguinte formato JSON:\n");
    prompt.push_str(
        r#"{
    "pontos_fortes": ["ponto1", "ponto2"],
    "pontos_fracos": ["ponto1", "ponto2"],
    "riscos": ["risco1", "risco2"],
    "oportunidades": ["oportunidade1", "oportunidade2"],
    "sugestoes_melhoria": ["sugestao1", "sugestao2"]
}
"#,
    );

    prompt
}

/// Stage 2: expand the legal grounding using the analysis
pub fn build_basis_prompt(analysis: &AnalysisResult) -> String {
    format!(
        "Com base na análise do caso, aprimore a fundamentação jurídica.\n\
         Considere os pontos fortes, fracos, riscos e oportunidades identificados.\n\n\
         Análise do caso:\n{}\n\n\
         Forneça uma fundamentação jurídica aprimorada, incluindo:\n\
         1. Base legal mais robusta\n\
         2. Jurisprudência relevante\n\
         3. Argumentos complementares\n\
         4. Contrarrazões a possíveis objeções\n",
        analysis.to_prompt_json()
    )
}

/// Stage 3: draft the document from the two prior artifacts
pub fn build_drafting_prompt(analysis: &AnalysisResult, basis: &str) -> String {
    format!(
        "Elabore uma peça jurídica formal e bem estruturada, incluindo:\n\
         1. Qualificação das partes\n\
         2. Dos fatos\n\
         3. Do direito\n\
         4. Dos pedidos\n\n\
         Formatação:\n\
         - Títulos de seção em maiúsculas, em linha própria (ex.: DOS FATOS)\n\
         - Incisos como \"I - texto\" e alíneas como \"a) texto\", um por linha\n\
         - Parágrafos numerados como \"§ 1. texto\"\n\
         - Introduza os pedidos com \"requer a Vossa Excelência:\" seguido dos pedidos separados por ponto e vírgula\n\n\
         Utilize a análise do caso e a fundamentação aprimorada como base.\n\n\
         Análise do caso:\n{}\n\n\
         Fundamentação aprimorada:\n{}\n",
        analysis.to_prompt_json(),
        basis.trim()
    )
}

/// Stage 4: structured critique of the drafted document
pub fn build_review_prompt(document: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("Revise a peça jurídica elaborada e forneça um parecer estruturado em formato JSON.\n\n");
    prompt.push_str("Documento:\n");
    prompt.push_str(document.trim());
    prompt.push_str("\n\n");

    prompt.push_str("Forneça a revisão no seguinte formato JSON:\n");
    prompt.push_str(
        r#"{
    "estrutura": "avaliação da estrutura do documento",
    "clareza": "avaliação da clareza do documento",
    "coerencia": "avaliação da coerência do documento",
    "sugestoes_melhoria": ["sugestao1", "sugestao2"]
}
"#,
    );

    prompt
}

/// Single-call generation: every section under its literal marker
pub fn build_single_call_prompt(case: &CaseInput) -> String {
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "Gere uma peça jurídica do tipo {} com as seguintes informações:\n\n",
        case.case_type()
    ));
    push_case_fields(&mut prompt, case);

    prompt.push_str("## Instruções\n");
    prompt.push_str("1. Use linguagem jurídica formal e técnica.\n");
    prompt.push_str("2. Inclua citações relevantes de leis e jurisprudência.\n");
    prompt.push_str("3. Não use HTML, Markdown nem CSS: apenas texto.\n");
    prompt.push_str("4. Escreva cada seção abaixo do seu marcador, exatamente como indicado, com o marcador sozinho na linha:\n\n");

    for section in Section::ALL {
        prompt.push_str(&format!("{}\n{}\n\n", section.marker(), section_instruction(section)));
    }

    prompt.push_str("5. Na seção [REQUESTS], separe os pedidos com ponto e vírgula.\n");
    prompt.push_str("6. Não escreva nada fora dos marcadores.\n");

    prompt
}

fn section_instruction(section: Section) -> &'static str {
    match section {
        Section::Parties => "Qualificação completa das partes.",
        Section::Facts => "Narrativa dos fatos.",
        Section::LegalGrounds => "Fundamentação jurídica, com incisos (I -) e alíneas (a)) quando apropriado.",
        Section::Requests => "Pedidos.",
        Section::ValueCause => "Valor da causa (ex.: R$ 10.000,00).",
        Section::CityDate => "Cidade e data (ex.: São Paulo, 10 de março de 2025).",
        Section::LawyerName => "Nome do(a) advogado(a).",
        Section::LawyerOab => "Número de inscrição na OAB.",
    }
}

fn push_case_fields(prompt: &mut String, case: &CaseInput) {
    prompt.push_str(&format!("Tipo de peça: {}\n\n", case.case_type()));
    prompt.push_str(&format!("PARTES ENVOLVIDAS:\n{}\n\n", case.parties()));
    prompt.push_str(&format!("FATOS:\n{}\n\n", case.facts()));
    prompt.push_str(&format!("FUNDAMENTAÇÃO JURÍDICA:\n{}\n\n", case.legal_grounds()));
    prompt.push_str(&format!("PEDIDOS:\n{}\n\n", case.requests()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseForm, ValidationLimits};

    fn sample_case() -> CaseInput {
        CaseForm {
            case_type: "Contestação".to_string(),
            parties: "Maria Souza, brasileira, casada, contra Banco Exemplo S.A., inscrito no CNPJ".to_string(),
            facts: "A autora teve seu nome negativado indevidamente em janeiro, sem dívida existente.".to_string(),
            legal_grounds: "Art. 14 do CDC e art. 186 do Código Civil, responsabilidade objetiva do fornecedor.".to_string(),
            requests: "Indenização por danos morais; exclusão do nome dos cadastros de inadimplentes.".to_string(),
        }
        .validate(&ValidationLimits::default())
        .unwrap()
    }

    #[test]
    fn test_analysis_prompt_has_case_and_keys() {
        let prompt = build_analysis_prompt(&sample_case());
        assert!(prompt.contains("Contestação"));
        assert!(prompt.contains("Maria Souza"));
        assert!(prompt.contains("pontos_fortes"));
        assert!(prompt.contains("sugestoes_melhoria"));
    }

    #[test]
    fn test_basis_prompt_interpolates_analysis() {
        let analysis = AnalysisResult {
            risks: vec!["Ausência de prova do dano".to_string()],
            ..Default::default()
        };
        let prompt = build_basis_prompt(&analysis);
        assert!(prompt.contains("Ausência de prova do dano"));
        assert!(prompt.contains("Jurisprudência relevante"));
    }

    #[test]
    fn test_drafting_prompt_includes_basis() {
        let prompt = build_drafting_prompt(&AnalysisResult::default(), "  Súmula 385 do STJ  ");
        assert!(prompt.contains("Fundamentação aprimorada:\nSúmula 385 do STJ"));
        assert!(prompt.contains("requer a Vossa Excelência:"));
    }

    #[test]
    fn test_single_call_prompt_lists_every_marker() {
        let prompt = build_single_call_prompt(&sample_case());
        for section in Section::ALL {
            assert!(prompt.contains(section.marker()), "missing {}", section.marker());
        }
    }

    #[test]
    fn test_review_prompt_embeds_document() {
        let prompt = build_review_prompt("DOS FATOS\nTexto da peça");
        assert!(prompt.contains("Texto da peça"));
        assert!(prompt.contains("\"coerencia\""));
    }
}
