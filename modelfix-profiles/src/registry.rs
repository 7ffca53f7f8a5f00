use crate::{BreakingChange, ErrorPattern, LanguageProfile};
use modelfix_types::LanguageFamily;

/// Registry of every language profile.
pub static PROFILES: &[LanguageProfile] = &[
    // 1) Ruby / Rails
    LanguageProfile {
        family: LanguageFamily::Ruby,
        name: "Ruby/Rails",
        extensions: &[".rb"],
        manifest: "Gemfile",
        lockfile: "Gemfile.lock",
        dependency_manager: "bundler",
        setup_action: "ruby/setup-ruby",
        runtime_version: None,
        install_commands: &[
            "bundle config set --local deployment false",
            "bundle config set --local path vendor/bundle",
            "bundle install --jobs 4",
        ],
        test_commands: &[
            "bin/rails test:prepare || bin/rake test:prepare",
            "bin/rails test",
        ],
        test_framework: "rails-test",
        major_version_indicators: &[("rails", 7), ("sinatra", 3)],
        breaking_changes: &[BreakingChange {
            package: "rails",
            major: 8,
            notes: "- Remove hash rocket syntax from method calls: `render :json => data` → `render json: data`
- Check Rack 3.0 compatibility (cookies, query parsing)
- Active Record `find(nil)` behavior changed (raises error instead of returning nil)
- `has_secure_password` no longer accepts password argument",
        }],
        upgrade_resources: &[
            "https://guides.rubyonrails.org/",
            "https://github.com/rails/rails/releases",
        ],
        problematic_dependencies: &["devise", "pundit", "cancan", "carrierwave", "paperclip"],
        error_patterns: &[
            ErrorPattern {
                name: "missing_method",
                pattern: r"undefined method `(\w+)' for",
            },
            ErrorPattern {
                name: "wrong_number_args",
                pattern: r"wrong number of arguments \(given (\d+), expected (\d+)\)",
            },
            ErrorPattern {
                name: "const_error",
                pattern: r"uninitialized constant (\S+)",
            },
            ErrorPattern {
                name: "load_error",
                pattern: r"cannot load such file",
            },
        ],
    },
    // 2) JavaScript / Node
    LanguageProfile {
        family: LanguageFamily::JavaScript,
        name: "JavaScript/Node.js",
        extensions: &[".js", ".jsx", ".mjs"],
        manifest: "package.json",
        lockfile: "package-lock.json",
        dependency_manager: "npm",
        setup_action: "actions/setup-node",
        runtime_version: None,
        install_commands: &["npm install"],
        test_commands: &["npm test", "npm run test:unit"],
        test_framework: "jest|mocha|vitest",
        major_version_indicators: &[("express", 5), ("webpack", 5), ("next", 13), ("react", 18)],
        breaking_changes: &[
            BreakingChange {
                package: "express",
                major: 5,
                notes: "- Remove express.static middleware auto-import: `const bodyParser = require('body-parser')`
- Change to: `app.use(express.json())`",
            },
            BreakingChange {
                package: "webpack",
                major: 5,
                notes: "- Entry points must be explicit objects, not implicit
- Asset modules replace file-loader, url-loader, raw-loader",
            },
        ],
        upgrade_resources: &[
            "https://nodejs.org/en/docs/",
            "https://www.npmjs.com/",
            "https://webpack.js.org/migrate/",
        ],
        problematic_dependencies: &["express", "lodash", "moment", "webpack", "babel"],
        error_patterns: &[
            ErrorPattern {
                name: "undefined",
                pattern: r"(\w+) is not defined",
            },
            ErrorPattern {
                name: "import_error",
                pattern: r"Cannot find module '([^']+)'",
            },
            ErrorPattern {
                name: "syntax_error",
                pattern: r"SyntaxError: (.*)",
            },
            ErrorPattern {
                name: "type_error",
                pattern: r"TypeError: (.*)",
            },
        ],
    },
    // 3) TypeScript
    LanguageProfile {
        family: LanguageFamily::TypeScript,
        name: "TypeScript",
        extensions: &[".ts", ".tsx"],
        manifest: "package.json",
        lockfile: "package-lock.json",
        dependency_manager: "npm",
        setup_action: "actions/setup-node",
        runtime_version: None,
        install_commands: &["npm install"],
        test_commands: &["npm test", "tsc --noEmit"],
        test_framework: "jest|vitest",
        major_version_indicators: &[("typescript", 5)],
        breaking_changes: &[],
        upgrade_resources: &[
            "https://www.typescriptlang.org/docs/",
            "https://www.typescriptlang.org/docs/handbook/release-notes/",
        ],
        problematic_dependencies: &[],
        error_patterns: &[],
    },
    // 4) Python
    LanguageProfile {
        family: LanguageFamily::Python,
        name: "Python",
        extensions: &[".py"],
        manifest: "requirements.txt",
        lockfile: "requirements.txt",
        dependency_manager: "pip",
        setup_action: "actions/setup-python",
        runtime_version: Some("3.11"),
        install_commands: &[
            "python -m pip install --upgrade pip",
            "pip install -r requirements.txt",
        ],
        test_commands: &[
            "python -m pytest",
            "python -m pytest tests/",
            "python -m unittest discover",
        ],
        test_framework: "pytest|unittest",
        major_version_indicators: &[("django", 4), ("flask", 2), ("python", 4)],
        breaking_changes: &[
            BreakingChange {
                package: "django",
                major: 4,
                notes: "- Remove django.conf.urls.url(): use django.urls.path() or re_path() instead
- QuerySet.extra() removed: use annotate() or raw SQL
- default_auto_field default changed to BigAutoField",
            },
            BreakingChange {
                package: "flask",
                major: 2,
                notes: "- Python 3.7+ required
- Changed imports: Flask.json → Flask.json
- app.json() → app.json interface changed",
            },
        ],
        upgrade_resources: &[
            "https://docs.djangoproject.com/en/stable/releases/",
            "https://flask.palletsprojects.com/en/latest/changes/",
            "https://docs.python.org/3/whatsnew/",
        ],
        problematic_dependencies: &["django", "flask", "sqlalchemy", "numpy", "pandas"],
        error_patterns: &[
            ErrorPattern {
                name: "import_error",
                pattern: r"ModuleNotFoundError: No module named '(\w+)'",
            },
            ErrorPattern {
                name: "attribute_error",
                pattern: r"AttributeError: (.*)",
            },
            ErrorPattern {
                name: "type_error",
                pattern: r"TypeError: (.*)",
            },
            ErrorPattern {
                name: "deprecation",
                pattern: r"DeprecationWarning: (.*)",
            },
        ],
    },
    // 5) Java
    LanguageProfile {
        family: LanguageFamily::Java,
        name: "Java",
        extensions: &[".java"],
        manifest: "pom.xml",
        lockfile: "pom.xml",
        dependency_manager: "maven",
        setup_action: "actions/setup-java",
        runtime_version: Some("17"),
        install_commands: &["mvn clean install"],
        test_commands: &["mvn test", "./gradlew test"],
        test_framework: "junit|testng",
        major_version_indicators: &[("java", 11), ("spring-boot", 3)],
        breaking_changes: &[BreakingChange {
            package: "spring-boot",
            major: 3,
            notes: "- Java 17+ required
- javax.* imports → jakarta.* imports
- Remove spring-boot-starter-validation dependency (included in web starter)",
        }],
        upgrade_resources: &[
            "https://www.oracle.com/java/technologies/",
            "https://spring.io/projects/spring-framework",
            "https://mvnrepository.com/",
        ],
        problematic_dependencies: &["spring-boot", "hibernate", "log4j", "junit"],
        error_patterns: &[
            ErrorPattern {
                name: "class_not_found",
                pattern: r"error: cannot find symbol",
            },
            ErrorPattern {
                name: "import_error",
                pattern: r"error: package (.*) does not exist",
            },
            ErrorPattern {
                name: "method_error",
                pattern: r"error: cannot find symbol.*method",
            },
        ],
    },
    // 6) PHP
    LanguageProfile {
        family: LanguageFamily::Php,
        name: "PHP",
        extensions: &[".php"],
        manifest: "composer.json",
        lockfile: "composer.lock",
        dependency_manager: "composer",
        setup_action: "shivammathur/setup-php",
        runtime_version: Some("8.2"),
        install_commands: &["composer install"],
        test_commands: &["php artisan test", "./vendor/bin/phpunit"],
        test_framework: "phpunit|pest",
        major_version_indicators: &[("php", 8), ("laravel", 10)],
        breaking_changes: &[BreakingChange {
            package: "laravel",
            major: 9,
            notes: "- Symfony component version bump to 6.0+
- Route model binding: implicit vs explicit casting
- Pagination defaults changed",
        }],
        upgrade_resources: &[
            "https://www.php.net/releases/",
            "https://laravel.com/docs/releases",
            "https://packagist.org/",
        ],
        problematic_dependencies: &["laravel", "symfony", "doctrine", "phpunit"],
        error_patterns: &[],
    },
    // 7) .NET
    LanguageProfile {
        family: LanguageFamily::DotNet,
        name: ".NET/C#",
        extensions: &[".cs"],
        manifest: "*.csproj",
        lockfile: "*.csproj",
        dependency_manager: "nuget",
        setup_action: "actions/setup-dotnet",
        runtime_version: Some("8.0"),
        install_commands: &["dotnet restore"],
        test_commands: &["dotnet test"],
        test_framework: "xunit|nunit|mstest",
        major_version_indicators: &[("dotnet", 8)],
        breaking_changes: &[],
        upgrade_resources: &[
            "https://docs.microsoft.com/en-us/dotnet/",
            "https://www.nuget.org/",
            "https://github.com/dotnet/runtime/releases",
        ],
        problematic_dependencies: &["entity-framework", "aspnetcore", "mvc"],
        error_patterns: &[],
    },
];
