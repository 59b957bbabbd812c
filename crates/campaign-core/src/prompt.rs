//! Prompt construction for the generation model.
//!
//! Every prompt is a plain instruction string with bracketed section headers.
//! The analysis text fed back into the image prompts is embedded verbatim
//! between `---` fences.

use crate::campaign::{CampaignParameters, Language, Style};

/// Accent color requested for generated banners.
pub const PRIMARY_COLOR: &str = "#C8E546";
/// Text and section color requested for generated banners.
pub const SECONDARY_COLOR: &str = "#1013B9";

/// Main analysis prompt.
pub fn analysis_prompt(params: &CampaignParameters, style: Style, language: Language) -> String {
    format!(
        "[ROLE] Vous êtes un expert en marketing digital avec 15 ans d'expérience spécialisé en {domain}.\n\
[CONTEXTE] Analyse de campagne marketing pour un client.\n\
\n\
[PARAMETRES CLIENT]\n\
- Budget: {budget} €\n\
- Audience: {audience}\n\
- Durée: {duration} jours\n\
- Objectif: {goal}\n\
- Domaine: {domain}\n\
\n\
[INSTRUCTIONS]\n\
1. Analysez les performances attendues (ROI, CPA, etc.)\n\
2. Proposez 3 stratégies concrètes adaptées\n\
3. Liste des canaux prioritaires\n\
4. Estimation des résultats\n\
5. Conseils d'optimisation\n\
\n\
[FORMAT DE REPONSE]\n\
### Analyse Prédictive\n\
- ROI estimé: X% à Y%\n\
- CPA moyen: Z €\n\
\n\
### Stratégies Recommandées\n\
1. Stratégie 1\n\
2. Stratégie 2\n\
3. Stratégie 3\n\
\n\
### Canaux Prioritaires\n\
- Canal 1 (X% du budget)\n\
- Canal 2 (Y% du budget)\n\
\n\
[STYLE] {style}\n\
[LANGUE] {language}\n",
        domain = params.domain,
        budget = params.budget,
        audience = params.audience.label(),
        duration = params.duration.days(),
        goal = params.goal.label(),
        style = style.instruction(),
        language = language.label(),
    )
}

/// Premium insights prompt.
pub fn premium_insights_prompt(params: &CampaignParameters) -> String {
    format!(
        "[ROLE] Expert en analyse marketing premium\n\
[TACHE] Générer des insights exclusifs pour:\n\
- Budget: {budget} €\n\
- Audience: {audience}\n\
- Domaine: {domain}\n\
\n\
[CONTENU EXCLUSIF]\n\
1. Tendances actuelles du secteur\n\
2. Opportunités sous-exploitées\n\
3. Stratégie premium détaillée\n\
4. Étude de cas similaire\n\
5. Checklist d'optimisation\n",
        budget = params.budget,
        audience = params.audience.label(),
        domain = params.domain,
    )
}

/// Advertising visual prompt, inspired by the finished analysis.
pub fn visual_asset_prompt(analysis: &str, domain: &str) -> String {
    format!(
        "[ROLE] Vous êtes un directeur artistique expert en publicité.\n\
[CONTEXTE] Créer un visuel publicitaire percutant (bannière ou poster) pour une campagne marketing.\n\
[INSPIRATION] Le texte suivant est l'analyse stratégique de la campagne :\n\
---\n\
{analysis}\n\
---\n\
[INSTRUCTIONS]\n\
1. Analysez les éléments clés de la stratégie : l'audience, l'objectif, et le domaine ({domain}).\n\
2. Imaginez un concept visuel fort qui incarne l'esprit de la campagne.\n\
3. Générez une image publicitaire (format 1200x628 pixels) moderne, esthétique et professionnelle.\n\
4. Intégrez un slogan court et percutant directement dans l'image.\n\
5. Assurez-vous que le style visuel est adapté au secteur d'activité : '{domain}'.\n\
\n\
[EXEMPLE DE STYLE]\n\
- Technologie : style épuré, futuriste, couleurs vives.\n\
- Mode : image élégante, typographie stylisée.\n\
- Restauration : image appétissante et chaleureuse.\n\
\n\
Générez l'image directement.\n",
        analysis = analysis.trim(),
        domain = domain,
    )
}

/// KPI summary banner prompt. The model extracts ROI and CPA from the analysis.
pub fn summary_banner_prompt(analysis: &str, domain: &str) -> String {
    format!(
        "[ROLE] Vous êtes un designer de données expert, spécialisé dans les rapports visuels marketing.\n\
[CONTEXTE] Créez une bannière de résumé (format 1200x400 pixels) à partir de l'analyse de campagne ci-dessous.\n\
\n\
[ANALYSE MARKETING À SYNTHÉTISER]\n\
---\n\
{analysis}\n\
---\n\
\n\
[INSTRUCTIONS]\n\
1. Identifiez le \"ROI estimé\" et le \"CPA moyen\" dans le texte.\n\
2. Présentez ces deux KPIs de manière proéminente, une section chacun.\n\
3. Incorporez le titre \"Synthèse des Résultats\".\n\
4. Inspirez le style visuel du domaine '{domain}'.\n\
\n\
[EXIGENCES DE DESIGN]\n\
- Icônes simples : fusée ou graphique pour le ROI, cible ou caddie pour le CPA.\n\
- Couleur primaire '{primary}' pour les accents, couleur secondaire '{secondary}' pour le texte principal.\n\
- Fond neutre et clair (#f9fafb), police sans-serif, valeurs des KPIs en gras.\n\
- Slogan optionnel : \"La data au service de votre croissance.\"\n\
\n\
Générez l'image directement.\n",
        analysis = analysis.trim(),
        domain = domain,
        primary = PRIMARY_COLOR,
        secondary = SECONDARY_COLOR,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::{Audience, CampaignDuration, Goal};

    fn params(budget: u32, domain: &str) -> CampaignParameters {
        CampaignParameters::new(
            budget,
            Audience::Age35To44,
            CampaignDuration::TwoWeeks,
            Goal::Awareness,
            domain,
        )
        .unwrap()
    }

    #[test]
    fn test_analysis_prompt_contains_parameters_verbatim() {
        for audience in Audience::ALL {
            for duration in CampaignDuration::ALL {
                let mut p = params(23_500, "Restauration rapide");
                p.audience = audience;
                p.duration = duration;
                let prompt = analysis_prompt(&p, Style::Dynamic, Language::English);
                assert!(prompt.contains("23500"));
                assert!(prompt.contains(audience.label()));
                assert!(prompt.contains(&format!("{} jours", duration.days())));
                assert!(prompt.contains("Restauration rapide"));
            }
        }
    }

    #[test]
    fn test_analysis_prompt_sections_in_order() {
        let prompt = analysis_prompt(&params(15_000, "Finance"), Style::Formal, Language::French);
        let headers = [
            "[ROLE]",
            "[CONTEXTE]",
            "[PARAMETRES CLIENT]",
            "[INSTRUCTIONS]",
            "[FORMAT DE REPONSE]",
            "[STYLE]",
            "[LANGUE]",
        ];
        let mut last = 0;
        for header in headers {
            let pos = prompt.find(header).expect(header);
            assert!(pos >= last, "{} out of order", header);
            last = pos;
        }
    }

    #[test]
    fn test_style_and_language_selection() {
        let prompt = analysis_prompt(&params(15_000, "Mode"), Style::Humor, Language::English);
        assert!(prompt.contains(Style::Humor.instruction()));
        assert!(prompt.contains("[LANGUE] Anglais"));
    }

    #[test]
    fn test_premium_prompt_mentions_budget_and_domain() {
        let prompt = premium_insights_prompt(&params(8_000, "Tourisme"));
        assert!(prompt.contains("8000 €"));
        assert!(prompt.contains("Domaine: Tourisme"));
    }

    #[test]
    fn test_image_prompts_embed_analysis() {
        let analysis = "### Analyse Prédictive\n- ROI estimé: 12% à 18%";
        let visual = visual_asset_prompt(analysis, "Mode");
        let banner = summary_banner_prompt(analysis, "Mode");
        assert!(visual.contains(analysis));
        assert!(banner.contains(analysis));
        assert!(banner.contains(PRIMARY_COLOR));
        assert!(banner.contains(SECONDARY_COLOR));
    }
}
