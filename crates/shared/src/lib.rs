use serde::{Deserialize, Serialize};

/// Уникальный идентификатор элемента сцены
pub type ElementId = String;

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    1
}

fn default_opacity() -> f32 {
    1.0
}

fn default_color() -> [f32; 3] {
    [0.7, 0.7, 0.72]
}

/// Трансформация элемента относительно родителя
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    /// Углы Эйлера в градусах (порядок XYZ)
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    /// Трансформация, состоящая только из переноса
    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: [x, y, z],
            ..Self::new()
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::new()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Материал (общий для нескольких мешей, ссылка по индексу)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDesc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Цвет RGB в диапазоне 0..1
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

impl Default for MaterialDesc {
    fn default() -> Self {
        Self {
            name: None,
            color: default_color(),
            opacity: default_opacity(),
        }
    }
}

/// Треугольная геометрия меша в локальных координатах
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryDesc {
    /// Позиции вершин (пустой список = буфер позиций отсутствует)
    #[serde(default)]
    pub positions: Vec<[f32; 3]>,
    /// Нормали вершин (если есть, передаются при экспорте без пересчёта)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<[f32; 3]>>,
    /// Индексы треугольников (None: неиндексированная геометрия)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u32>>,
}

impl GeometryDesc {
    /// Количество треугольников
    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }
}

/// Меш: геометрия + индексы материалов сцены
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MeshDesc {
    pub geometry: GeometryDesc,
    /// Индексы в `SceneDescription::materials`
    #[serde(default)]
    pub materials: Vec<usize>,
}

/// Элемент графа сцены (группа, сборка или меш)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneElement {
    /// Идентификатор; если не задан, назначается при загрузке
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ElementId>,
    /// Исходное имя объекта
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Семантическое имя (приоритетнее исходного)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_name: Option<String>,
    /// Явная пометка «сборка» (даже если пустая)
    #[serde(default)]
    pub assembly: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshDesc>,
    #[serde(default)]
    pub children: Vec<SceneElement>,
}

impl Default for SceneElement {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            semantic_name: None,
            assembly: false,
            visible: true,
            transform: Transform::new(),
            mesh: None,
            children: Vec::new(),
        }
    }
}

impl SceneElement {
    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    /// Количество элементов в поддереве (включая этот)
    pub fn element_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.element_count()).sum::<usize>()
    }
}

/// Описание сцены: набор загруженных моделей
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub materials: Vec<MaterialDesc>,
    /// Корни независимо загруженных моделей
    #[serde(default)]
    pub models: Vec<SceneElement>,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            version: default_version(),
            materials: Vec::new(),
            models: Vec::new(),
        }
    }
}

impl SceneDescription {
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Общее количество элементов во всех моделях
    pub fn element_count(&self) -> usize {
        self.models.iter().map(|m| m.element_count()).sum()
    }
}
