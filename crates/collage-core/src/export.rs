use crate::model::LayoutPlan;
use serde_json::{Value, json};

/// Serialize a plan as a JSON object `{ canvas, columns, items }`.
/// Suitable for generic tooling and for replaying the layout elsewhere;
/// `items` preserves the export order (columns left to right, top to
/// bottom).
pub fn to_json(plan: &LayoutPlan) -> Value {
    let items: Vec<Value> = plan
        .items
        .iter()
        .map(|item| {
            json!({
                "photo": item.photo,
                "frame": {
                    "x": item.position.x,
                    "y": item.position.y,
                    "w": item.size.width,
                    "h": item.size.height,
                },
                "ops": item.ops,
            })
        })
        .collect();
    json!({
        "canvas": { "w": plan.canvas.width, "h": plan.canvas.height },
        "columns": { "count": plan.column_count, "width": plan.column_width },
        "items": items,
    })
}
