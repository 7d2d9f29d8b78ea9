use crate::ir::{Mindmap, MindmapNode, NodeKind};
use crate::parser::root_title;
use tracing::debug;

struct SampleBranch {
    id: &'static str,
    title: &'static str,
    details: &'static str,
    subs: &'static [(&'static str, &'static str)],
}

const BRANCHES: [SampleBranch; 5] = [
    SampleBranch {
        id: "marketing",
        title: "Marketing Strategy",
        details: "Define who the app is for, how it stands apart from competitors and how the brand and content reach those users.",
        subs: &[
            ("Target Audience Definition", "Build personas and find where your users spend their time online."),
            ("Competitor Analysis", "Compare direct and indirect competitors and look for the gaps they leave."),
            ("Brand Identity Creation", "Settle the brand story, visual identity and voice."),
            ("Content Marketing Strategy", "Plan blog, social and email content around user questions."),
        ],
    },
    SampleBranch {
        id: "development",
        title: "Development Roadmap",
        details: "The technical path from choosing a stack through MVP scope, design, timeline and testing.",
        subs: &[
            ("Technical Stack Selection", "Pick platforms and frameworks that fit the team and the expected scale."),
            ("MVP Feature Definition", "Keep the few features that deliver most of the value."),
            ("UI/UX Design Process", "Go from user flows to a clickable prototype and test it early."),
            ("Development Timeline", "Split the work into sprints with room for QA and surprises."),
            ("Testing Strategy", "Cover units, integration and devices, and automate where possible."),
        ],
    },
    SampleBranch {
        id: "research",
        title: "Market Research",
        details: "Validate the idea before committing resources: market size, user interviews and problem severity.",
        subs: &[
            ("Market Size Analysis", "Estimate the addressable, available and obtainable market."),
            ("User Surveys & Interviews", "Talk to likely users and test their willingness to pay."),
            ("Problem Validation", "Check that the problem is frequent and painful enough to pay for."),
        ],
    },
    SampleBranch {
        id: "promotion",
        title: "Promotion & Growth",
        details: "Launch the app and grow its user base through channels, store presence and partners.",
        subs: &[
            ("Launch Strategy", "Build a pre-launch list and plan the launch announcements."),
            ("Digital Marketing Channels", "Start with the two or three channels your audience uses most."),
            ("ASO Strategy", "Tune store keywords, screenshots and early reviews."),
            ("Partnership Opportunities", "Find complementary businesses and niche influencers."),
        ],
    },
    SampleBranch {
        id: "finance",
        title: "Financial Planning",
        details: "Budget the build and the marketing, choose a revenue model and decide how to fund growth.",
        subs: &[
            ("Development Budget", "Estimate design, development, QA and third-party service costs."),
            ("Revenue Model Selection", "Weigh freemium, subscription and one-time purchase models."),
            ("Marketing Budget", "Set acquisition cost targets and launch spend."),
            ("Funding Strategy", "Choose between bootstrapping, investors and grants."),
        ],
    },
];

/// Built-in mindmap used when a generated reply cannot be parsed: the core
/// idea, the five standard categories and a handful of sub-categories each.
/// It carries no steps, so progress tracking stays empty.
pub fn sample_mindmap(app_idea: &str) -> Mindmap {
    let mut root = MindmapNode::new("core-1", NodeKind::Root, None, &root_title(app_idea));
    root.details = Some(format!(
        "Your app idea: {app_idea}\n\nThe branches explore building, marketing and launching it."
    ));
    let mut nodes = vec![root];

    for branch in &BRANCHES {
        let mut category =
            MindmapNode::new(branch.id, NodeKind::Category, Some("core-1"), branch.title);
        category.details = Some(branch.details.to_string());
        nodes.push(category);

        for (idx, (title, details)) in branch.subs.iter().enumerate() {
            let id = format!("{}-{}", branch.id, idx + 1);
            let mut sub = MindmapNode::new(&id, NodeKind::SubCategory, Some(branch.id), title);
            sub.details = Some(details.to_string());
            nodes.push(sub);
        }
    }

    debug!(nodes = nodes.len(), "built sample mindmap");
    Mindmap::new(nodes)
}
