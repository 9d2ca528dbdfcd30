//! 初回起動時に投入するサンプル記事
//!
//! 投入は `ArticleStore::initialize_default_news` からのみ行われ、
//! ユーザー作成の記事と同じ検証・タイムスタンプ規則を通ります。

use crate::domain::ArticleInput;

struct SeedArticle {
    title: &'static str,
    summary: &'static str,
    content: &'static str,
    author: &'static str,
}

const DEFAULT_NEWS: &[SeedArticle] = &[
    SeedArticle {
        title: "Bienvenido al Sistema de Noticias",
        summary: "Una guía rápida para publicar, editar y buscar noticias.",
        content: "Este sistema permite crear noticias con título, resumen, contenido, autor \
                  e imagen opcional. Todas las noticias se guardan localmente en este \
                  dispositivo y siguen disponibles en la próxima sesión.",
        author: "Equipo Editorial",
    },
    SeedArticle {
        title: "Nueva biblioteca municipal abre sus puertas",
        summary: "El edificio cuenta con sala de lectura, zona infantil y acceso gratuito.",
        content: "La nueva biblioteca municipal abrió este lunes con más de veinte mil \
                  volúmenes, una sala de estudio silenciosa y un espacio dedicado a talleres \
                  para niños. El horario de apertura será de lunes a sábado.",
        author: "María González",
    },
    SeedArticle {
        title: "El equipo local gana el campeonato regional",
        summary: "Una victoria en el último minuto selló el título de la temporada.",
        content: "Con un gol en el tiempo de descuento, el equipo local se impuso en la final \
                  del campeonato regional. Los aficionados celebraron en la plaza central \
                  hasta bien entrada la noche.",
        author: "Carlos Ruiz",
    },
];

/// Seed inputs, newest first.
pub fn default_news() -> Vec<ArticleInput> {
    DEFAULT_NEWS
        .iter()
        .map(|s| ArticleInput::new(s.title, s.summary, s.content, s.author))
        .collect()
}
