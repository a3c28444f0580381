//! Built-in onboarding templates.

use crate::catalog::TaskOwner;
use crate::catalog::TaskOwner::{Employee, Manager};

pub(crate) struct TaskRow {
    pub owner: TaskOwner,
    pub title: &'static str,
    pub description: &'static str,
    pub offset_days: i64,
}

pub(crate) struct VariantRows {
    pub tasks: &'static [TaskRow],
    pub employee_plan: [&'static str; 3],
    pub manager_plan: [&'static str; 3],
}

pub(crate) struct TemplateRows {
    pub key: &'static str,
    pub en: VariantRows,
    pub ja: VariantRows,
}

const fn task(
    owner: TaskOwner,
    title: &'static str,
    description: &'static str,
    offset_days: i64,
) -> TaskRow {
    TaskRow {
        owner,
        title,
        description,
        offset_days,
    }
}

pub(crate) const BUILTIN_TEMPLATES: &[TemplateRows] = &[
    TemplateRows {
        key: "general_newgrad",
        en: VariantRows {
            tasks: &[
                task(Employee, "Complete HR paperwork", "Fill in onboarding forms and submit required documents.", 0),
                task(Employee, "Read company handbook", "Review key policies and working norms.", 2),
                task(Manager, "Set up first-week agenda", "Align meetings, buddy assignment, and access requests.", -3),
            ],
            employee_plan: [
                "Understand team mission, tools, and workflows. Deliver a small starter task.",
                "Own a scoped workstream end-to-end. Start proposing improvements.",
                "Operate independently on core responsibilities. Identify growth goals with manager.",
            ],
            manager_plan: [
                "Set weekly 1:1 cadence; ensure environment setup; clarify expectations.",
                "Review progress vs role expectations; assign a medium-sized project.",
                "Performance checkpoint and growth plan; calibrate responsibilities.",
            ],
        },
        ja: VariantRows {
            tasks: &[
                task(Employee, "人事書類を完了", "オンボーディングフォームに記入し、必要な書類を提出してください。", 0),
                task(Employee, "会社ハンドブックを読む", "重要なポリシーと業務規範を確認してください。", 2),
                task(Manager, "初週のアジェンダを設定", "ミーティング、バディ割り当て、アクセスリクエストを調整してください。", -3),
            ],
            employee_plan: [
                "チームのミッション、ツール、ワークフローを理解する。小さなスタートタスクを提供する。",
                "スコープ付きワークストリームをエンドツーエンドで所有する。改善を提案し始める。",
                "コア責任において独立して運用する。マネージャーと成長目標を特定する。",
            ],
            manager_plan: [
                "週次1対1のリズムを設定; 環境セットアップを確保; 期待値を明確にする。",
                "役割期待値に対する進捗を確認; 中規模プロジェクトを割り当てる。",
                "パフォーマンスチェックポイントと成長計画; 責任を調整する。",
            ],
        },
    },
    TemplateRows {
        key: "general_mid",
        en: VariantRows {
            tasks: &[
                task(Employee, "Confirm role expectations", "Align your 30/60/90-day objectives with the manager.", 0),
                task(Manager, "Introduce key stakeholders", "Arrange introductions to cross-functional partners.", 3),
            ],
            employee_plan: [
                "Map stakeholders, understand current projects, deliver quick wins.",
                "Lead a key initiative and share progress updates.",
                "Drive measurable impact and propose next-quarter roadmap.",
            ],
            manager_plan: [
                "Clarify authority/decision boundaries; provide context and priorities.",
                "Remove blockers and validate impact metrics.",
                "Set next goals and confirm long-term ownership areas.",
            ],
        },
        ja: VariantRows {
            tasks: &[
                task(Employee, "役割期待値を確認", "30/60/90日の目標をマネージャーと調整してください。", 0),
                task(Manager, "主要ステークホルダーを紹介", "クロスファンクショナルパートナーへの紹介を手配してください。", 3),
            ],
            employee_plan: [
                "ステークホルダーをマッピングし、現在のプロジェクトを理解し、クイックウィンを提供する。",
                "主要なイニシアチブをリードし、進捗更新を共有する。",
                "測定可能な影響を推進し、次四半期のロードマップを提案する。",
            ],
            manager_plan: [
                "権限/決定の境界を明確にする; コンテキストと優先順位を提供する。",
                "ブロッカーを削除し、影響指標を検証する。",
                "次の目標を設定し、長期的な所有領域を確認する。",
            ],
        },
    },
    TemplateRows {
        key: "eng_newgrad",
        en: VariantRows {
            tasks: &[
                task(Employee, "Set up dev environment", "Install required tools, access repos, run the project locally.", 0),
                task(Employee, "Complete security training", "Finish required security modules and acknowledge policies.", 7),
                task(Manager, "Assign onboarding starter ticket", "Pick a well-scoped ticket suitable for first 2 weeks.", 1),
            ],
            employee_plan: [
                "Ship first small PR and understand the deployment flow.",
                "Own a feature slice and participate in code reviews.",
                "Become dependable on a component; contribute to design discussions.",
            ],
            manager_plan: [
                "Ensure access + environment; set mentorship plan.",
                "Expand responsibilities; ensure feedback loop.",
                "Evaluate readiness for deeper ownership if applicable.",
            ],
        },
        ja: VariantRows {
            tasks: &[
                task(Employee, "開発環境をセットアップ", "必要なツールをインストールし、リポジトリにアクセスし、プロジェクトをローカルで実行してください。", 0),
                task(Employee, "セキュリティ研修を完了", "必要なセキュリティモジュールを完了し、ポリシーを承認してください。", 7),
                task(Manager, "オンボーディング開始チケットを割り当て", "最初の2週間に適した適切にスコープされたチケットを選択してください。", 1),
            ],
            employee_plan: [
                "最初の小さなPRを出荷し、デプロイフローを理解する。",
                "機能スライスを所有し、コードレビューに参加する。",
                "コンポーネントで信頼できるようになる; 設計ディスカッションに貢献する。",
            ],
            manager_plan: [
                "アクセス + 環境を確保; メンターシップ計画を設定する。",
                "責任を拡大; フィードバックループを確保する。",
                "該当する場合、より深い所有権の準備状況を評価する。",
            ],
        },
    },
    TemplateRows {
        key: "cs_mid",
        en: VariantRows {
            tasks: &[
                task(Employee, "Review support playbook", "Learn escalation policies and standard response templates.", 0),
                task(Manager, "Shadow sessions", "Set up 3 shadowing sessions for the first 2 weeks.", 1),
            ],
            employee_plan: [
                "Handle common tickets with supervision; learn product basics.",
                "Own a queue segment; improve macros/templates.",
                "Lead complex cases; propose CS process improvements.",
            ],
            manager_plan: [
                "Set quality bar and review loop.",
                "Calibrate performance metrics and ownership.",
                "Confirm long-term focus area and growth track.",
            ],
        },
        ja: VariantRows {
            tasks: &[
                task(Employee, "サポートプレイブックを確認", "エスカレーションポリシーと標準応答テンプレートを学習してください。", 0),
                task(Manager, "シャドウセッション", "最初の2週間で3つのシャドウセッションを設定してください。", 1),
            ],
            employee_plan: [
                "監督下で一般的なチケットを処理; 製品の基本を学習する。",
                "キューセグメントを所有; マクロ/テンプレートを改善する。",
                "複雑なケースをリード; CSプロセスの改善を提案する。",
            ],
            manager_plan: [
                "品質基準とレビューループを設定する。",
                "パフォーマンス指標と所有権を調整する。",
                "長期的な焦点領域と成長トラックを確認する。",
            ],
        },
    },
];
