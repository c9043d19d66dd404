//! Identity and canned content shown by the terminal.

/// URLs opened by the link commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    pub github: String,
    pub linkedin: String,
    pub cv: String,
}

/// Everything the static commands print. `Default` is the built-in portfolio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    pub hostname: String,
    /// `~` means the home directory.
    pub cwd: String,
    pub links: Links,
    pub welcome: Vec<String>,
    pub about: Vec<String>,
    pub projects: Vec<String>,
    pub skills: Vec<String>,
    pub contact: Vec<String>,
    pub listing: Vec<String>,
}

/// Marker for the home directory in [`Profile::cwd`].
pub const HOME_MARKER: &str = "~";

const RULE: &str = "==========================";
const THIN_RULE: &str = "--------------------------";

fn lines(src: &[&str]) -> Vec<String> {
    src.iter().map(|s| s.to_string()).collect()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            username: "guest".into(),
            hostname: "portfolio".into(),
            cwd: HOME_MARKER.into(),
            links: Links {
                github: "https://github.com/ValentinoFarishAdrian".into(),
                linkedin: "https://www.linkedin.com/in/valentino-farish-adrian/".into(),
                cv: "https://drive.google.com/drive/folders/1VtsucPCF-VEaGWOZ68Fu352eLhhK7Uxj?usp=sharing".into(),
            },
            welcome: lines(&[
                "Welcome to Valentino Farish Adrian portfolio!",
                "Type 'help' for available commands",
            ]),
            about: lines(&[
                RULE,
                "Valentino Farish Adrian",
                "Computer Engineering Undergrad Student",
                RULE,
                "I'm a highly motivated Computer Engineering undergraduate at ",
                "Universitas Indonesia with strong experience in multimedia, leadership,",
                "and technical problem-solving.",
                "Former Vice Head of Multimedia Bureau at BEM UI, where I demonstrated",
                "exceptional teamwork and project management skills.",
                "Passionate about software engineering, networking, and IoT systems.",
                "Adept at creating innovative solutions, particularly in real-time IoT applications and network security.",
                "Proactively engages in technical development and collaborative projects to deliver impactful results.",
                RULE,
            ]),
            projects: lines(&[
                RULE,
                "PROJECTS",
                RULE,
                "CLI Portfolio",
                "A terminal-style portfolio",
                "built with Rust, ratatui and tokio",
                RULE,
            ]),
            skills: lines(&[
                RULE,
                "TECHNICAL SKILLS",
                RULE,
                "Languages:",
                "Java, C, C++, JavaScript, Python, HTML/CSS",
                THIN_RULE,
                "Frontend:",
                "React, Tailwind CSS, Bootstrap",
                THIN_RULE,
                "Backend:",
                "Node.js, Express, MongoDB, SQL",
                THIN_RULE,
                "Tools & Other:",
                "Wireshark, Kali Linux, Git, Cisco Packet Tracer",
                RULE,
            ]),
            contact: lines(&[
                RULE,
                "CONTACT INFORMATION",
                RULE,
                "Email:",
                "vfarish28@gmail.com",
                THIN_RULE,
                "Instagram:",
                "@valentinofarish",
                RULE,
                "",
                "Feel free to reach out for collaborations or opportunities!",
            ]),
            listing: lines(&["about.txt  projects.md  skills.json  contact.info  .hidden"]),
        }
    }
}

impl Profile {
    /// `/home/<user>` plus the current directory unless it is the home marker.
    pub fn working_directory(&self) -> String {
        if self.cwd == HOME_MARKER {
            format!("/home/{}", self.username)
        } else {
            format!("/home/{}{}", self.username, self.cwd)
        }
    }

    /// `user@host`, as shown in the prompt and the title bar.
    pub fn identity(&self) -> String {
        format!("{}@{}", self.username, self.hostname)
    }
}
