//! Built-in template variants

use super::manifest::{Placeholder, TemplateDescriptor, TemplateEntry};
use crate::error::Result;
use serde_json::json;
use std::sync::LazyLock;
use tracing::error;

/// Variant used when none is requested
pub const DEFAULT_TEMPLATE: &str = "default";

const NAME: &[Placeholder] = &[Placeholder::ProjectName];
const SECRET: &[Placeholder] = &[Placeholder::Secret];
const NONE: &[Placeholder] = &[];

static DEFAULT_DESCRIPTOR: LazyLock<Result<TemplateDescriptor>> = LazyLock::new(|| {
    TemplateDescriptor::new(
        DEFAULT_TEMPLATE,
        "Express + OpenAI chat assistant in TypeScript",
        "package.json",
        ".env",
        vec![
            TemplateEntry::structured(
                "package.json",
                json!({
                    "name": "{{projectName}}",
                    "version": "0.1.0",
                    "private": true,
                    "type": "module",
                    "scripts": {
                        "dev": "tsx watch src/index.ts",
                        "build": "tsc",
                        "start": "node dist/index.js"
                    },
                    "dependencies": {
                        "dotenv": "^16.4.5",
                        "express": "^4.21.2",
                        "openai": "^4.77.0"
                    },
                    "devDependencies": {
                        "@types/express": "^5.0.0",
                        "@types/node": "^22.10.2",
                        "tsx": "^4.19.2",
                        "typescript": "^5.7.2"
                    }
                }),
                NAME,
            ),
            TemplateEntry::structured(
                "tsconfig.json",
                json!({
                    "compilerOptions": {
                        "target": "ES2022",
                        "module": "NodeNext",
                        "moduleResolution": "NodeNext",
                        "outDir": "dist",
                        "rootDir": "src",
                        "strict": true,
                        "esModuleInterop": true,
                        "skipLibCheck": true
                    },
                    "include": ["src"]
                }),
                NONE,
            ),
            TemplateEntry::text(
                ".gitignore",
                include_str!("../../templates/default/gitignore"),
                NONE,
            ),
            TemplateEntry::text(
                ".env.example",
                include_str!("../../templates/default/env.example"),
                NONE,
            ),
            TemplateEntry::text(
                ".env",
                include_str!("../../templates/default/env"),
                SECRET,
            ),
            TemplateEntry::text(
                "README.md",
                include_str!("../../templates/default/README.md"),
                NAME,
            ),
            TemplateEntry::text(
                "src/index.ts",
                include_str!("../../templates/default/index.ts"),
                NAME,
            ),
            TemplateEntry::text(
                "src/chat.ts",
                include_str!("../../templates/default/chat.ts"),
                NONE,
            ),
            TemplateEntry::text(
                "public/index.html",
                include_str!("../../templates/default/index.html"),
                NAME,
            ),
        ],
    )
});

/// Names of all built-in variants
pub fn available_templates() -> Vec<&'static str> {
    vec![DEFAULT_TEMPLATE]
}

/// Look up a built-in variant by name
pub fn descriptor_for(variant: &str) -> Option<&'static TemplateDescriptor> {
    match variant {
        DEFAULT_TEMPLATE => DEFAULT_DESCRIPTOR
            .as_ref()
            .inspect_err(|err| error!(variant, error = %err, "built-in template is malformed"))
            .ok(),
        _ => None,
    }
}
