pub const SCANNER_SYSTEM: &str = "You are an elite news scanner. You pull the signal out of the noise. \
Facts come first, recent facts before old ones. Be concise.";

pub const VERIFIER_SYSTEM: &str = "You are a strict fact checker. Nothing is true until a search \
confirms it. Be skeptical of every claim, date and attribution.";

pub const CONTEXTUALIZER_SYSTEM: &str = "You are a historian and intelligence analyst. You explain \
the why and the how: precedent, background and consequence. You know the past in detail.";

pub const WRITER_SYSTEM: &str = "You are a senior investigative editor with a record of \
award-winning work. You make complex subjects clear, structured and compelling.";

pub fn scanner_prompt(topic: &str) -> String {
    format!(
        r#"Investigate the topic: "{topic}".
Goal: surface the latest breaking news, events or public discourse from roughly the last 30 days.

Instructions:
1. Search for recent news articles and major updates.
2. If the subject is a historical event, look for any new updates, anniversaries or related recent incidents.
3. If nothing recent exists, say explicitly that the primary event is historical.

Output: a concise summary of the CURRENT status or the latest relevant occurrences."#
    )
}

pub fn verifier_prompt(topic: &str, scan: &str) -> String {
    format!(
        r#"Validate the following findings about "{topic}":
"{scan}"

Task:
1. Verify whether these events happened as described.
2. Flag any likely misinformation or unconfirmed rumors.
3. Confirm dates and key actors.

Output: a "Verified Facts" bulleted list and a "Credibility Assessment" (High/Medium/Low)."#
    )
}

pub fn contextualizer_prompt(topic: &str, verified: &str) -> String {
    format!(
        r#"Provide the master context for: "{topic}".

Verified information:
"{verified}"

Task:
1. Explain the history. If this is a repeat event, give details of past occurrences (dates, casualties, outcome).
2. Explain the significance and why it matters now.
3. Connect past and present."#
    )
}

pub fn writer_prompt(topic: &str, scan: &str, verified: &str, context: &str) -> String {
    format!(
        r#"Produce a highly structured "CONFIDENTIAL INTELLIGENCE DOSSIER" on: "{topic}".

Inputs:
- Latest news: {scan}
- Verified facts: {verified}
- Context: {context}

Format requirements (strict Markdown):
1. Title: start with a single # H1 title, catchy and descriptive.
2. Executive summary: a > blockquote holding the Bottom Line Up Front (BLUF).
3. Sections: ## H2 headers for "Situation Report", "Key Evidence" and "Historical Precedent".
4. Lists: bullet points for facts and timeline events.
5. Emphasis: **bold** for critical entities, dates and threat levels.

Tone: high-stakes intelligence briefing. Objective, urgent, precise. No filler."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_inputs() {
        assert!(scanner_prompt("Port strike").contains("\"Port strike\""));
        assert!(scanner_prompt("x").contains("30 days"));

        let verify = verifier_prompt("t", "SCAN-OUTPUT");
        assert!(verify.contains("SCAN-OUTPUT"));
        assert!(verify.contains("Credibility Assessment"));

        assert!(contextualizer_prompt("t", "VERIFIED").contains("VERIFIED"));

        let write = writer_prompt("t", "S1", "V1", "C1");
        for needle in ["S1", "V1", "C1", "# H1", "> blockquote", "Situation Report"] {
            assert!(write.contains(needle), "missing {needle}");
        }
    }
}
